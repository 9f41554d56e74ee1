//! Typed declarations built from resolved wiring commands.
//!
//! [`ContainerDefinition`] is the bridge between the command layer and the
//! resolution engine: it turns the body of a `container(...)` command into a
//! map of dependency definitions keyed by identifier, rejecting duplicates.

use std::collections::BTreeMap;
use std::fmt;

use wiregen_common::types::{
    AccessLevel, BindingName, ClassOrFunctionName, ContainerName, DependencyIdentifier,
    SourceLocation,
};

use crate::commands::ContainerCommand;
use crate::error::{Result, WiringErrorKind};
use crate::injectable::{InjectableClassDefinition, InjectableFunctionDefinition};

/// How often a declared dependency is constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DependencyKind {
    /// Constructed at most once per container instance, then cached.
    Singleton,
    /// Constructed fresh on every request.
    Build,
}

/// How a declared dependency is bound.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindingType {
    /// Bound to a protocol name distinct from the implementing type.
    Binding(BindingName),
    /// Bound under the injectable's own name.
    Instance,
}

/// One dependency declared inside a container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyDefinition {
    /// Construction policy.
    pub kind: DependencyKind,
    /// Binding style.
    pub binding_type: BindingType,
    /// Implementing class or factory function.
    pub class_or_function_name: ClassOrFunctionName,
    /// Identifier of the dependency slot this definition fills.
    pub identifier: DependencyIdentifier,
    /// Access level of the generated factory.
    pub access_level: AccessLevel,
    /// Location of the declaring container.
    pub source_location: SourceLocation,
}

impl DependencyDefinition {
    /// Returns a copy with the identifier replaced, used when a bare
    /// function-name shorthand is rewritten to the function's true binding.
    #[must_use]
    pub fn with_identifier(mut self, identifier: DependencyIdentifier) -> Self {
        self.identifier = identifier;
        self
    }

    /// Name of the generated factory method for this dependency.
    ///
    /// A pure function of the identifier; distinct identifiers mapping to the
    /// same name is a reportable collision.
    #[must_use]
    pub fn build_function_name(&self) -> String {
        format!("build{}", upper_camel(&self.identifier))
    }

    /// Name of the generated lazily-initialized storage slot.
    #[must_use]
    pub fn singleton_name(&self) -> String {
        format!("singleton{}", upper_camel(&self.identifier))
    }
}

impl fmt::Display for DependencyDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} -> {}",
            self.identifier, self.class_or_function_name
        )
    }
}

/// A declared container: its name, the protocol it was declared on, and the
/// dependency definitions keyed by identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerDefinition {
    /// Name of the generated container type.
    pub container_name: ContainerName,
    /// Name of the protocol the container was declared on.
    pub container_protocol_name: BindingName,
    /// Declared dependencies, keyed and iterated by identifier.
    pub dependency_map: BTreeMap<DependencyIdentifier, DependencyDefinition>,
    /// Access level of the generated container type.
    pub access_level: AccessLevel,
    /// Location of the container declaration.
    pub source_location: SourceLocation,
}

impl ContainerDefinition {
    /// Builds a container definition from the body of a resolved
    /// `container(...)` command.
    ///
    /// # Errors
    ///
    /// Fails when the body declares no bindings, declares the same
    /// dependency identifier twice, or carries more than one `access(...)`
    /// command.
    pub fn from_commands(
        container_name: ContainerName,
        container_protocol_name: BindingName,
        commands: &[ContainerCommand],
        source_location: SourceLocation,
    ) -> Result<Self> {
        let mut access_level: Option<AccessLevel> = None;
        let mut dependency_map: BTreeMap<DependencyIdentifier, DependencyDefinition> =
            BTreeMap::new();

        for command in commands {
            let definition = match command {
                ContainerCommand::Access(level) => {
                    if access_level.is_some() {
                        return Err(
                            WiringErrorKind::DuplicateAccessCommand.at(source_location.clone())
                        );
                    }
                    access_level = Some(*level);
                    continue;
                }
                ContainerCommand::Bind {
                    class,
                    binding,
                    modifiers,
                } => DependencyDefinition {
                    kind: DependencyKind::Build,
                    binding_type: BindingType::Binding(binding.clone()),
                    class_or_function_name: class.clone(),
                    identifier: DependencyIdentifier::new(binding.clone(), modifiers.name.clone()),
                    access_level: modifiers.access.unwrap_or_default(),
                    source_location: source_location.clone(),
                },
                ContainerCommand::SingletonBind {
                    class,
                    binding,
                    modifiers,
                } => DependencyDefinition {
                    kind: DependencyKind::Singleton,
                    binding_type: BindingType::Binding(binding.clone()),
                    class_or_function_name: class.clone(),
                    identifier: DependencyIdentifier::new(binding.clone(), modifiers.name.clone()),
                    access_level: modifiers.access.unwrap_or_default(),
                    source_location: source_location.clone(),
                },
                ContainerCommand::Instance { class, modifiers } => DependencyDefinition {
                    kind: DependencyKind::Build,
                    binding_type: BindingType::Instance,
                    class_or_function_name: class.clone(),
                    identifier: DependencyIdentifier::new(
                        BindingName::new(class.as_str()),
                        modifiers.name.clone(),
                    ),
                    access_level: modifiers.access.unwrap_or_default(),
                    source_location: source_location.clone(),
                },
                ContainerCommand::Singleton { class, modifiers } => DependencyDefinition {
                    kind: DependencyKind::Singleton,
                    binding_type: BindingType::Instance,
                    class_or_function_name: class.clone(),
                    identifier: DependencyIdentifier::new(
                        BindingName::new(class.as_str()),
                        modifiers.name.clone(),
                    ),
                    access_level: modifiers.access.unwrap_or_default(),
                    source_location: source_location.clone(),
                },
            };

            let identifier = definition.identifier.clone();
            if dependency_map.insert(identifier.clone(), definition).is_some() {
                return Err(
                    WiringErrorKind::DuplicateBinding { identifier }.at(source_location.clone())
                );
            }
        }

        if dependency_map.is_empty() {
            return Err(WiringErrorKind::MissingBindings.at(source_location.clone()));
        }

        Ok(Self {
            container_name,
            container_protocol_name,
            dependency_map,
            access_level: access_level.unwrap_or_default(),
            source_location,
        })
    }

    /// Declared dependencies in identifier order.
    pub fn dependencies(&self) -> impl Iterator<Item = &DependencyDefinition> {
        self.dependency_map.values()
    }
}

/// Everything the declaration-extraction front end found in one source file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceDefinition {
    /// Path of the source file.
    pub file_name: String,
    /// Container declarations in the file.
    pub containers: Vec<ContainerDefinition>,
    /// Injectable class declarations in the file.
    pub injectable_classes: Vec<InjectableClassDefinition>,
    /// Injectable factory-function declarations in the file.
    pub injectable_functions: Vec<InjectableFunctionDefinition>,
}

/// Upper-camel rendering of an identifier, used for generated type-level
/// names: `Logger(primary)` becomes `LoggerPrimary`.
pub(crate) fn upper_camel(identifier: &DependencyIdentifier) -> String {
    let mut out = capitalize(identifier.binding_name.as_str());
    if let Some(name) = &identifier.name {
        out.push_str(&capitalize(name.as_str()));
    }
    out
}

/// Lower-camel rendering of an identifier, used for generated parameter
/// names: `Logger(primary)` becomes `loggerPrimary`.
pub(crate) fn lower_camel(identifier: &DependencyIdentifier) -> String {
    let mut chars = upper_camel(identifier).into_bytes();
    if let Some(first) = chars.first_mut() {
        first.make_ascii_lowercase();
    }
    String::from_utf8(chars).unwrap_or_default()
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_ascii_uppercase().to_string() + chars.as_str()
    })
}
