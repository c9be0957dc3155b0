mod command;
mod enumeration;
mod shape;

#[cfg(test)]
pub(self) fn simple_format(rust_str: String) -> String {
    rust_str
        .replace('{', "{\n")
        .replace('}', "}\n")
        .replace(';', ";\n")
}
