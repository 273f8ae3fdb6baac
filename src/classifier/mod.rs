//! Role classification for declarations
//!
//! CDD Principle: Domain Services - The classifier is a total, pure function of a Declaration
//! - Kind plus modifiers decide the role; nothing else is consulted
//! - Final locals stay local variables unless the caller opts in

use crate::domain::{Declaration, DeclarationKind, Modifier, Role};
use serde::{Deserialize, Serialize};

/// Knobs that change how ambiguous declarations are classified
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClassifierOptions {
    /// Treat `final` local variables as constants
    #[serde(default)]
    pub final_locals_as_constants: bool,
}

/// Maps declarations to naming roles
#[derive(Debug, Clone, Copy, Default)]
pub struct RoleClassifier {
    options: ClassifierOptions,
}

impl RoleClassifier {
    pub fn new(options: ClassifierOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> ClassifierOptions {
        self.options
    }

    /// Classify a declaration into exactly one role
    pub fn classify(&self, declaration: &Declaration) -> Role {
        match declaration.kind {
            DeclarationKind::Class => Role::TypeName,
            DeclarationKind::Interface => Role::InterfaceName,
            DeclarationKind::Field => {
                if declaration.has_modifier(Modifier::Static)
                    && declaration.has_modifier(Modifier::Final)
                {
                    Role::ConstantName
                } else {
                    Role::FieldName
                }
            }
            DeclarationKind::Method => Role::MethodName,
            DeclarationKind::LocalVariable => {
                if self.options.final_locals_as_constants
                    && declaration.has_modifier(Modifier::Final)
                {
                    Role::ConstantName
                } else {
                    Role::LocalVariableName
                }
            }
            DeclarationKind::Parameter => Role::ParameterName,
            DeclarationKind::Package => Role::PackageName,
        }
    }
}

/// Classify with default options
pub fn classify(declaration: &Declaration) -> Role {
    RoleClassifier::default().classify(declaration)
}
