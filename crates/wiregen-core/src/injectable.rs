//! Injectable declarations supplied by the declaration-extraction front end.
//!
//! An injectable is either a class (constructed through its initializer) or a
//! factory function (its return type names the binding it satisfies). The two
//! shapes form a closed tagged union; every consumer matches exhaustively.

use wiregen_common::types::{
    BindingName, ClassOrFunctionName, DependencyIdentifier, SourceLocation,
};

/// One parameter of an initializer or factory function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParameterDefinition {
    /// A parameter marked as a dependency slot with a `dependency` command.
    Dependency(DependencyParameter),
    /// A plain parameter the caller must supply at build time.
    Plain {
        /// Parameter name as declared.
        parameter_name: String,
    },
}

impl ParameterDefinition {
    /// `true` for plain (non-dependency) parameters.
    #[must_use]
    pub const fn is_plain(&self) -> bool {
        matches!(self, Self::Plain { .. })
    }
}

/// A dependency-tagged parameter: its declared name and the identifier of
/// the slot it consumes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyParameter {
    /// Parameter name as declared.
    pub parameter_name: String,
    /// Dependency slot the parameter consumes, binding from the parameter
    /// type plus the optional `dependency(Name)` disambiguator.
    pub identifier: DependencyIdentifier,
}

/// An injectable class declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InjectableClassDefinition {
    /// Declared class name.
    pub class_name: ClassOrFunctionName,
    /// Protocols and superclasses the class can be bound to.
    pub inheritance_chain: Vec<BindingName>,
    /// Initializer parameters in declaration order.
    pub parameters: Vec<ParameterDefinition>,
    /// Location of the class declaration.
    pub source_location: SourceLocation,
}

/// An injectable factory-function declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InjectableFunctionDefinition {
    /// Declared function name.
    pub function_name: ClassOrFunctionName,
    /// Binding satisfied by the function, taken from its return type.
    pub binding_name: BindingName,
    /// Function parameters in declaration order.
    pub parameters: Vec<ParameterDefinition>,
    /// Location of the function declaration.
    pub source_location: SourceLocation,
}

/// A declared constructible unit eligible for wiring.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Injectable {
    /// Class-based injectable.
    Class(InjectableClassDefinition),
    /// Function-based injectable.
    Function(InjectableFunctionDefinition),
}

impl Injectable {
    /// Identifiers of every dependency slot the injectable requires.
    pub fn dependency_identifiers(&self) -> impl Iterator<Item = &DependencyIdentifier> {
        self.parameters().iter().filter_map(|parameter| match parameter {
            ParameterDefinition::Dependency(dependency) => Some(&dependency.identifier),
            ParameterDefinition::Plain { .. } => None,
        })
    }

    /// All declared parameters, dependency-tagged and plain.
    #[must_use]
    pub fn parameters(&self) -> &[ParameterDefinition] {
        match self {
            Self::Class(class) => &class.parameters,
            Self::Function(function) => &function.parameters,
        }
    }

    /// `true` when the injectable has plain constructor/factory parameters.
    ///
    /// Such injectables cannot be singletons and cannot be depended on from
    /// within the container, since nothing would supply those parameters.
    #[must_use]
    pub fn has_parameters(&self) -> bool {
        self.parameters().iter().any(ParameterDefinition::is_plain)
    }

    /// Declared class or function name.
    #[must_use]
    pub const fn class_or_function_name(&self) -> &ClassOrFunctionName {
        match self {
            Self::Class(class) => &class.class_name,
            Self::Function(function) => &function.function_name,
        }
    }

    /// Location of the declaration.
    #[must_use]
    pub const fn source_location(&self) -> &SourceLocation {
        match self {
            Self::Class(class) => &class.source_location,
            Self::Function(function) => &function.source_location,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn location() -> SourceLocation {
        SourceLocation::new("ViewModels.wire", 4, 1)
    }

    fn dependency(binding: &str) -> ParameterDefinition {
        ParameterDefinition::Dependency(DependencyParameter {
            parameter_name: binding.to_lowercase(),
            identifier: DependencyIdentifier::unnamed(BindingName::new(binding)),
        })
    }

    #[test]
    fn class_exposes_dependency_identifiers_in_order() {
        let injectable = Injectable::Class(InjectableClassDefinition {
            class_name: ClassOrFunctionName::new("LoginViewModel"),
            inheritance_chain: vec![BindingName::new("ViewModel")],
            parameters: vec![
                dependency("Logger"),
                ParameterDefinition::Plain {
                    parameter_name: "title".into(),
                },
                dependency("ApiClient"),
            ],
            source_location: location(),
        });

        let identifiers: Vec<_> = injectable.dependency_identifiers().collect();
        assert_eq!(identifiers.len(), 2);
        assert_eq!(identifiers[0].binding_name, BindingName::new("Logger"));
        assert_eq!(identifiers[1].binding_name, BindingName::new("ApiClient"));
    }

    #[test]
    fn plain_parameter_sets_has_parameters() {
        let injectable = Injectable::Function(InjectableFunctionDefinition {
            function_name: ClassOrFunctionName::new("makeLogger"),
            binding_name: BindingName::new("Logger"),
            parameters: vec![ParameterDefinition::Plain {
                parameter_name: "level".into(),
            }],
            source_location: location(),
        });
        assert!(injectable.has_parameters());
    }

    #[test]
    fn dependency_only_parameters_do_not_count_as_plain() {
        let injectable = Injectable::Class(InjectableClassDefinition {
            class_name: ClassOrFunctionName::new("SessionManager"),
            inheritance_chain: Vec::new(),
            parameters: vec![dependency("Persistence")],
            source_location: location(),
        });
        assert!(!injectable.has_parameters());
    }
}
