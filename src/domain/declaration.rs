//! Declaration records and the naming vocabulary derived from them
//!
//! Architecture: Value Objects - Declarations arrive fully resolved from an external parser
//! - A Declaration is immutable once produced; the engine only reads it
//! - Role and CaseStyle are closed enums so rule lookups stay exhaustive
//! - Source locations order file-then-line-then-column for stable reporting

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::path::PathBuf;

/// Syntactic kind of a named declaration, as reported by the parser
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeclarationKind {
    Class,
    Interface,
    Method,
    Field,
    LocalVariable,
    Parameter,
    Package,
}

impl DeclarationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Class => "class",
            Self::Interface => "interface",
            Self::Method => "method",
            Self::Field => "field",
            Self::LocalVariable => "local_variable",
            Self::Parameter => "parameter",
            Self::Package => "package",
        }
    }
}

/// Declaration modifiers relevant to naming
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Modifier {
    Static,
    Final,
    Public,
    Private,
    Protected,
    Abstract,
    Default,
    Synchronized,
    Transient,
    Volatile,
}

/// Where a declaration was found
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SourceLocation {
    /// Source file the declaration belongs to
    pub file: PathBuf,
    /// Line number (1-indexed)
    pub line: u32,
    /// Column number (1-indexed), when the parser reports one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column: Option<u32>,
}

impl SourceLocation {
    pub fn new(file: impl Into<PathBuf>, line: u32) -> Self {
        Self { file: file.into(), line, column: None }
    }

    pub fn with_column(mut self, column: u32) -> Self {
        self.column = Some(column);
        self
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.column {
            Some(column) => write!(f, "{}:{}:{}", self.file.display(), self.line, column),
            None => write!(f, "{}:{}", self.file.display(), self.line),
        }
    }
}

/// A named program entity with its modifiers and location
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Declaration {
    /// The identifier exactly as written in source
    pub identifier: String,
    /// Syntactic kind
    pub kind: DeclarationKind,
    /// Resolved modifiers (implicit ones included by the parser)
    #[serde(default)]
    pub modifiers: BTreeSet<Modifier>,
    /// Kind of the syntactically enclosing declaration, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enclosing_kind: Option<DeclarationKind>,
    /// Source location
    pub location: SourceLocation,
}

impl Declaration {
    /// Create a declaration without modifiers or enclosing context
    pub fn new(identifier: impl Into<String>, kind: DeclarationKind, location: SourceLocation) -> Self {
        Self {
            identifier: identifier.into(),
            kind,
            modifiers: BTreeSet::new(),
            enclosing_kind: None,
            location,
        }
    }

    /// Add modifiers
    pub fn with_modifiers(mut self, modifiers: impl IntoIterator<Item = Modifier>) -> Self {
        self.modifiers.extend(modifiers);
        self
    }

    /// Set the enclosing declaration kind
    pub fn within(mut self, enclosing: DeclarationKind) -> Self {
        self.enclosing_kind = Some(enclosing);
        self
    }

    pub fn has_modifier(&self, modifier: Modifier) -> bool {
        self.modifiers.contains(&modifier)
    }
}

/// Naming-convention category of a declaration
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    TypeName,
    InterfaceName,
    ConstantName,
    FieldName,
    MethodName,
    LocalVariableName,
    ParameterName,
    PackageName,
}

impl Role {
    /// Number of roles; rule tables are sized by it
    pub const COUNT: usize = 8;

    /// Every role, in table order
    pub const ALL: [Role; Role::COUNT] = [
        Role::TypeName,
        Role::InterfaceName,
        Role::ConstantName,
        Role::FieldName,
        Role::MethodName,
        Role::LocalVariableName,
        Role::ParameterName,
        Role::PackageName,
    ];

    /// Dense index into rule tables
    pub fn index(self) -> usize {
        match self {
            Self::TypeName => 0,
            Self::InterfaceName => 1,
            Self::ConstantName => 2,
            Self::FieldName => 3,
            Self::MethodName => 4,
            Self::LocalVariableName => 5,
            Self::ParameterName => 6,
            Self::PackageName => 7,
        }
    }

    /// Stable rule identifier for this role
    pub fn rule_id(self) -> &'static str {
        match self {
            Self::TypeName => "type_name",
            Self::InterfaceName => "interface_name",
            Self::ConstantName => "constant_name",
            Self::FieldName => "field_name",
            Self::MethodName => "method_name",
            Self::LocalVariableName => "local_variable_name",
            Self::ParameterName => "parameter_name",
            Self::PackageName => "package_name",
        }
    }

    /// Parse a rule identifier back into a role
    pub fn from_rule_id(rule_id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|role| role.rule_id() == rule_id)
    }

    /// Capitalized label used at the start of violation messages
    pub fn label(self) -> &'static str {
        match self {
            Self::TypeName => "Class name",
            Self::InterfaceName => "Interface name",
            Self::ConstantName => "Constant name",
            Self::FieldName => "Field name",
            Self::MethodName => "Method name",
            Self::LocalVariableName => "Local variable name",
            Self::ParameterName => "Parameter name",
            Self::PackageName => "Package name",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.rule_id())
    }
}

/// A formally defined casing convention
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaseStyle {
    /// `XmlParser`, `OAuth2Client`
    PascalCase,
    /// `userName`, `x`
    CamelCase,
    /// `DATABASE_URL`
    UpperSnakeCase,
    /// `com.example.naming`
    LowerDotted,
}

impl CaseStyle {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::PascalCase => "PascalCase",
            Self::CamelCase => "camelCase",
            Self::UpperSnakeCase => "UPPER_SNAKE_CASE",
            Self::LowerDotted => "lower.dotted",
        }
    }
}

impl fmt::Display for CaseStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
