use argshape_engine::{
    Action, Choice, Coercion, CommandLineParser, Entry, GeneralParser, Namespace, Nargs, Rule,
    Value,
};

use crate::error::DeclarationError;
use crate::reflect::{fields_of, invalid, FieldDescriptor, MetaValue, ShapeInfo};
use crate::types::{classify, is_enum, is_nested_shape, Member, TypeKind};

#[cfg(feature = "tracing_debug")]
use tracing::debug;

const FLAG_PREFIX: char = '-';
const DISABLE_PREFIX: &str = "no-";

/// The polarity of a boolean flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    /// `--name` sets the field to `true`.
    Enable,
    /// `--no-name` sets the field to `false`.
    Disable,
}

/// How a field's tokens are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Tokens coerced by the field's type.
    Scalar,
    /// A flag without a value.
    Toggle(Toggle),
    /// Tokens naming a member of an enumeration.
    Enumeration,
}

/// Where a field appears on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Matched by position.
    Positional,
    /// Matched by flag.
    Optional,
}

/// The derived parsing rule of one field.
#[derive(Clone)]
pub struct FlagRule {
    field: String,
    flags: Vec<String>,
    storage_key: String,
    placement: Placement,
    kind: FieldKind,
    repeated: bool,
    coercion: Option<Coercion>,
    choices: Vec<Choice>,
    required: bool,
    default: Entry,
    help: Option<String>,
    type_name: String,
}

impl std::fmt::Debug for FlagRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FlagRule")
            .field("field", &self.field)
            .field("flags", &self.flags)
            .field("storage_key", &self.storage_key)
            .field("placement", &self.placement)
            .field("kind", &self.kind)
            .field("repeated", &self.repeated)
            .field("required", &self.required)
            .field("default", &self.default)
            .finish()
    }
}

impl FlagRule {
    /// The field this rule parses.
    pub fn field(&self) -> &str {
        &self.field
    }

    /// The flag spellings; the display name for positional rules.
    pub fn flags(&self) -> &[String] {
        &self.flags
    }

    /// The key the parsed entry is stored under.
    pub fn storage_key(&self) -> &str {
        &self.storage_key
    }

    /// Where the field appears.
    pub fn placement(&self) -> Placement {
        self.placement
    }

    /// How the field's tokens are interpreted.
    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    /// Whether the field collects a sequence.
    pub fn repeated(&self) -> bool {
        self.repeated
    }

    /// The allowed values.
    pub fn choices(&self) -> &[Choice] {
        &self.choices
    }

    /// Whether the flag must be supplied.
    pub fn required(&self) -> bool {
        self.required
    }

    /// The entry stored when the field is not supplied.
    pub fn default(&self) -> &Entry {
        &self.default
    }

    /// The help description.
    pub fn help(&self) -> Option<&str> {
        self.help.as_deref()
    }

    fn to_rule(&self, members: Option<&[Member]>) -> Rule {
        let mut rule = match self.placement {
            Placement::Positional => {
                Rule::argument_as(self.flags[0].clone(), self.storage_key.clone()).nargs(
                    if self.repeated {
                        Nargs::Any
                    } else {
                        Nargs::ZeroOrOne
                    },
                )
            }
            Placement::Optional => {
                let rule = Rule::option(self.flags.clone(), self.storage_key.clone());

                match (self.kind, self.repeated) {
                    (FieldKind::Toggle(Toggle::Enable), _) => rule.action(Action::StoreTrue),
                    (FieldKind::Toggle(Toggle::Disable), _) => rule.action(Action::StoreFalse),
                    (_, true) => rule.action(Action::Append),
                    (_, false) => rule,
                }
            }
        };

        if let Some(coercion) = &self.coercion {
            rule = rule.coercion(coercion.clone());
        }

        rule = rule
            .choices(self.choices.clone())
            .required(self.required)
            .default(self.default.clone());

        if let Some(help) = &self.help {
            rule = rule.help(help.clone());
        }

        if !matches!(self.kind, FieldKind::Toggle(_)) {
            rule = rule.meta(format!("type: {}", self.type_name));

            if let Some(default) = describe_default(&self.default, members) {
                rule = rule.meta(format!("default: {default}"));
            }
        }

        rule
    }
}

fn describe_value(value: &Value, members: Option<&[Member]>) -> String {
    members
        .and_then(|members| members.iter().find(|m| m.value() == value))
        .map(|m| m.name().to_string())
        .unwrap_or_else(|| format!("{value:?}"))
}

fn describe_default(entry: &Entry, members: Option<&[Member]>) -> Option<String> {
    match entry {
        Entry::Single(value) => Some(describe_value(value, members)),
        Entry::Multiple(values) => Some(format!(
            "[{}]",
            values
                .iter()
                .map(|v| describe_value(v, members))
                .collect::<Vec<String>>()
                .join(", ")
        )),
        Entry::NotSupplied => None,
    }
}

/// Derives the command line schema of a shape.
///
/// ### Example
/// ```
/// use argshape::{FieldDescriptor, Metadata, SchemaBuilder, ShapeInfo};
///
/// let shape = ShapeInfo::new("Ls")
///     .field(FieldDescriptor::of::<Vec<String>>("excludes"))
///     .field(
///         FieldDescriptor::of::<Vec<String>>("paths")
///             .with_metadata(Metadata::default().with("positional", true)),
///     );
/// let schema = SchemaBuilder::new("ls").build(&shape).unwrap();
///
/// assert_eq!(schema.rules()[0].flags(), &["--exclude".to_string()]);
/// assert_eq!(schema.rules()[1].storage_key(), "paths");
/// ```
#[derive(Debug, Clone)]
pub struct SchemaBuilder {
    program: String,
    about: Option<String>,
    deplural: bool,
}

impl SchemaBuilder {
    /// Create a builder for the named program.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            about: None,
            deplural: true,
        }
    }

    /// Document the program; overrides the shape's own about message.
    pub fn about(mut self, description: impl Into<String>) -> Self {
        self.about.replace(description.into());
        self
    }

    /// Whether repeated field names drop their trailing `s` in the flag (default: `true`).
    pub fn deplural(mut self, deplural: bool) -> Self {
        self.deplural = deplural;
        self
    }

    /// The program name.
    pub fn program(&self) -> &str {
        &self.program
    }

    /// The long flag name of a field (without the `--` prefix).
    ///
    /// ### Example
    /// ```
    /// use argshape::SchemaBuilder;
    ///
    /// let builder = SchemaBuilder::new("program");
    /// assert_eq!(builder.flag_name("excludes", true), "exclude");
    /// assert_eq!(builder.flag_name("_dry_run_", false), "dry-run");
    /// ```
    pub fn flag_name(&self, name: &str, repeated: bool) -> String {
        let name = match name.strip_suffix('s') {
            Some(singular) if self.deplural && repeated && name.chars().count() > 3 => singular,
            _ => name,
        };

        name.trim_matches('_').replace('_', "-")
    }

    /// Derive the rule of every command line field of the shape, in declaration order.
    pub fn rules(&self, shape: &ShapeInfo) -> Result<Vec<FlagRule>, DeclarationError> {
        shape.validate()?;
        let mut rules = Vec::default();
        let mut first_positional: Option<String> = None;

        for field in fields_of(shape) {
            let name = field.name();
            let metadata = field.metadata();

            if metadata.flag(name, "cmdline")? == Some(false) {
                continue;
            }

            let rule = self.rule(field)?;

            if rule.placement == Placement::Positional {
                match &first_positional {
                    Some(first) if !shape.allows_multiple_positionals() => {
                        return Err(DeclarationError::MultiplePositionalFields {
                            first: first.clone(),
                            second: name.to_string(),
                        });
                    }
                    Some(_) => {}
                    None => {
                        first_positional.replace(name.to_string());
                    }
                }
            }

            rules.push(rule);
        }

        Ok(rules)
    }

    fn rule(&self, field: &FieldDescriptor) -> Result<FlagRule, DeclarationError> {
        let name = field.name();
        let metadata = field.metadata();
        let declared = field.declared_type();
        let (element, repeated) = classify(declared);

        if is_nested_shape(declared) {
            return Err(DeclarationError::UnsupportedNestedShape {
                field: name.to_string(),
                type_name: element.name().to_string(),
            });
        }

        let args = metadata.list(name, "args")?;
        let positional = args
            .and_then(|args| args.first())
            .map(|first| !first.starts_with(FLAG_PREFIX))
            .unwrap_or(false)
            || metadata.flag(name, "positional")? == Some(true);
        let flag_name = self.flag_name(name, repeated);
        let short = short_flag(field, &flag_name)?;

        if positional && short.is_some() {
            return Err(DeclarationError::PositionalWithShortFlag(name.to_string()));
        }

        let help = metadata.text(name, "help")?.map(str::to_string);
        let placement = if positional {
            Placement::Positional
        } else {
            Placement::Optional
        };
        let default_flags = || match short {
            Some(short) => vec![format!("-{short}"), format!("--{flag_name}")],
            None => vec![format!("--{flag_name}")],
        };

        if matches!(element.kind(), TypeKind::Toggle) && !repeated {
            if positional {
                return Err(DeclarationError::PositionalToggle(name.to_string()));
            }

            let enabled = match field.fallback() {
                Some(value) => *value.downcast_ref::<bool>().ok_or_else(|| {
                    DeclarationError::InvalidDefault {
                        field: name.to_string(),
                        type_name: declared.name().to_string(),
                    }
                })?,
                None => false,
            };
            let (toggle, flags) = if enabled {
                (
                    Toggle::Disable,
                    args.map(<[String]>::to_vec)
                        .unwrap_or_else(|| vec![format!("--{DISABLE_PREFIX}{flag_name}")]),
                )
            } else {
                (
                    Toggle::Enable,
                    args.map(<[String]>::to_vec).unwrap_or_else(default_flags),
                )
            };

            return Ok(FlagRule {
                field: name.to_string(),
                flags,
                storage_key: name.to_string(),
                placement,
                kind: FieldKind::Toggle(toggle),
                repeated,
                coercion: None,
                choices: Vec::default(),
                required: false,
                default: Entry::Single(Value::new(enabled)),
                help,
                type_name: declared.name().to_string(),
            });
        }

        let coercion = element
            .coercion()
            .ok_or_else(|| DeclarationError::UnsupportedType {
                field: name.to_string(),
                type_name: declared.name().to_string(),
            })?;
        let choices = choices(field, element.members(), &coercion, element.name())?;
        let fallback = field.fallback();
        let required = !positional && fallback.is_none();
        let default = match (fallback, declared.kind()) {
            (Some(value), TypeKind::Repeated { split, .. }) => {
                Entry::Multiple(split(&value).ok_or_else(|| DeclarationError::InvalidDefault {
                    field: name.to_string(),
                    type_name: declared.name().to_string(),
                })?)
            }
            (Some(value), _) => Entry::Single(value),
            (None, _) if repeated => Entry::Multiple(Vec::default()),
            (None, _) => Entry::NotSupplied,
        };
        let flags = match (positional, args) {
            (_, Some(args)) => args.to_vec(),
            (true, None) => vec![self.flag_name(name, false)],
            (false, None) => default_flags(),
        };
        Ok(FlagRule {
            field: name.to_string(),
            flags,
            storage_key: name.to_string(),
            placement,
            kind: if is_enum(element) {
                FieldKind::Enumeration
            } else {
                FieldKind::Scalar
            },
            repeated,
            coercion: Some(coercion),
            choices,
            required,
            default,
            help,
            type_name: element.name().to_string(),
        })
    }

    /// Derive the rules of the shape and configure the parsing engine with them.
    pub fn build(&self, shape: &ShapeInfo) -> Result<Schema, DeclarationError> {
        let rules = self.rules(shape)?;
        let mut clp = CommandLineParser::new(self.program.clone());

        if let Some(about) = self.about.as_deref().or(shape.about_message()) {
            clp = clp.about(about);
        }

        for rule in &rules {
            #[cfg(feature = "tracing_debug")]
            {
                debug!("add rule: {rule:?}");
            }

            let members = shape
                .get(&rule.field)
                .and_then(|field| classify(field.declared_type()).0.members());
            clp = clp.add(rule.to_rule(members));
        }

        Ok(Schema {
            shape: shape.clone(),
            rules,
            parser: clp.build_parser()?,
        })
    }
}

fn short_flag(field: &FieldDescriptor, flag_name: &str) -> Result<Option<char>, DeclarationError> {
    let name = field.name();
    let metadata = field.metadata();
    let implicit = || flag_name.chars().next();

    match metadata.get("short_flag") {
        Some(MetaValue::Bool(true)) => Ok(implicit()),
        Some(MetaValue::Bool(false)) => Ok(None),
        Some(MetaValue::Text(text)) => {
            let mut characters = text.trim_start_matches(FLAG_PREFIX).chars();

            match (characters.next(), characters.next()) {
                (Some(c), None) => Ok(Some(c)),
                _ => Err(invalid(name, "short_flag", "a bool or a single character")),
            }
        }
        Some(MetaValue::List(_)) => Err(invalid(name, "short_flag", "a bool or a single character")),
        None => match metadata.flag(name, "allow_short_flag")? {
            Some(true) => Ok(implicit()),
            _ => Ok(None),
        },
    }
}

fn choices(
    field: &FieldDescriptor,
    members: Option<&[Member]>,
    coercion: &Coercion,
    type_name: &str,
) -> Result<Vec<Choice>, DeclarationError> {
    let name = field.name();
    let labels: Vec<String> = match field.metadata().list(name, "choices")? {
        Some(labels) => labels.to_vec(),
        None => match members {
            Some(members) => members.iter().map(|m| m.name().to_string()).collect(),
            None => return Ok(Vec::default()),
        },
    };

    labels
        .into_iter()
        .map(|label| match coercion(&label) {
            Ok(value) => Ok(Choice::new(label, value)),
            Err(_) => Err(invalid(
                name,
                "choices",
                &format!("a list of '{type_name}' values"),
            )),
        })
        .collect()
}

/// The configured parser of a shape, along with the rules it was derived from.
#[derive(Debug)]
pub struct Schema {
    shape: ShapeInfo,
    rules: Vec<FlagRule>,
    parser: GeneralParser,
}

impl Schema {
    /// The shape the schema was derived from.
    pub fn shape(&self) -> &ShapeInfo {
        &self.shape
    }

    /// The rules, in declaration order.
    pub fn rules(&self) -> &[FlagRule] {
        &self.rules
    }

    /// The rule of the named field.
    pub fn rule(&self, field: &str) -> Option<&FlagRule> {
        self.rules.iter().find(|r| r.field == field)
    }

    /// The `(storage key, field)` pairs of the positional rules.
    pub fn positional_keys(&self) -> impl Iterator<Item = (&str, &str)> {
        self.rules
            .iter()
            .filter(|r| r.placement == Placement::Positional)
            .map(|r| (r.storage_key.as_str(), r.field.as_str()))
    }

    /// Parse the tokens into the raw namespace.
    ///
    /// See [`GeneralParser::parse_tokens`] for the exit code semantics.
    pub fn parse_tokens(&self, tokens: &[&str]) -> Result<Namespace, i32> {
        self.parser.parse_tokens(tokens)
    }

    /// Parse the process arguments into the raw namespace, exiting on user input errors or help.
    pub fn parse(&self) -> Namespace {
        self.parser.parse()
    }

    /// Render the help message.
    pub fn help(&self) -> String {
        self.parser.help()
    }
}
