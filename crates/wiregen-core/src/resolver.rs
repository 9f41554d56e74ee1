//! Container resolution engine.
//!
//! Resolution runs in two passes per container. The first pass matches every
//! declared dependency against the injectable index, rewrites bare
//! function-name shorthands to the function's true binding, and rejects
//! singletons over parameterized injectables. The second pass classifies
//! every slot each injectable consumes as internal, a container
//! self-reference, or external, building the internal dependency graph as it
//! goes. A cycle in that graph or a generated-name collision fails the
//! container as a whole.

use std::collections::{BTreeMap, BTreeSet};

use tracing::{debug, info};
use wiregen_common::types::{
    AccessLevel, BindingName, ContainerName, DependencyIdentifier, SourceLocation,
};

use crate::collections::{ContainerCollection, InjectableCollection};
use crate::definitions::{
    BindingType, ContainerDefinition, DependencyDefinition, DependencyKind, SourceDefinition,
    lower_camel, upper_camel,
};
use crate::error::{Result, WiringError, WiringErrorKind};
use crate::graph::DependencyGraph;
use crate::injectable::Injectable;

/// A dependency satisfied by another definition in the same container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InternalDependency {
    /// Identifier of the definition that satisfies the slot.
    pub identifier: DependencyIdentifier,
}

/// A dependency satisfied by the container passing itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerDependency {
    /// The container being passed.
    pub container_name: ContainerName,
}

/// A dependency nothing in the container satisfies; the generated container
/// takes a closure for it at construction time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalDependency {
    /// Identifier of the unsatisfied slot.
    pub identifier: DependencyIdentifier,
}

impl ExternalDependency {
    /// Name of the generated closure property backing the slot.
    #[must_use]
    pub fn closure_name(&self) -> String {
        format!("external{}", upper_camel(&self.identifier))
    }

    /// Name of the generated initializer parameter supplying the closure.
    #[must_use]
    pub fn parameter_name(&self) -> String {
        lower_camel(&self.identifier)
    }
}

/// How one consumed slot is satisfied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DependencyType {
    /// Satisfied by another definition in the container.
    Internal(InternalDependency),
    /// Satisfied by the container itself.
    Container(ContainerDependency),
    /// Supplied from outside the container.
    External(ExternalDependency),
}

/// One container dependency with every slot its injectable consumes
/// classified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedDependency {
    /// The declaration, identifier already rewritten for function
    /// shorthands.
    pub definition: DependencyDefinition,
    /// The matched injectable.
    pub injectable: Injectable,
    /// Classification of every slot the injectable consumes, keyed and
    /// iterated by identifier.
    pub dependencies: BTreeMap<DependencyIdentifier, DependencyType>,
}

/// A fully resolved container, ready for code generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedContainer {
    /// Name of the generated container type.
    pub container_name: ContainerName,
    /// Protocol the container was declared on.
    pub container_protocol_name: BindingName,
    /// Access level of the generated type.
    pub access_level: AccessLevel,
    /// Resolved dependencies in identifier order.
    pub dependencies: BTreeMap<DependencyIdentifier, ResolvedDependency>,
    /// Every externally supplied slot, deduplicated across dependencies.
    pub external_dependencies: BTreeMap<DependencyIdentifier, ExternalDependency>,
    /// Location of the container declaration.
    pub source_location: SourceLocation,
}

impl ResolvedContainer {
    /// Resolves one container definition against the injectable index.
    ///
    /// # Errors
    ///
    /// Fails when a declared dependency matches no injectable, a singleton
    /// or an internally depended-on injectable takes plain parameters, the
    /// internal graph has a cycle, or two identifiers collide on a generated
    /// name.
    pub fn resolve(
        container: &ContainerDefinition,
        injectables: &InjectableCollection,
    ) -> Result<Self> {
        let matched = match_definitions(container, injectables)?;

        let mut graph: DependencyGraph<DependencyIdentifier> = DependencyGraph::new();
        let mut dependencies = BTreeMap::new();
        let mut external_dependencies = BTreeMap::new();

        for (identifier, (definition, injectable)) in &matched {
            graph.add_node(identifier.clone());
            let mut consumed = BTreeMap::new();

            for required in injectable.dependency_identifiers() {
                let dependency_type = if let Some((target, target_injectable)) =
                    matched.get(required)
                {
                    if target_injectable.has_parameters() {
                        return Err(WiringErrorKind::DependsOnParameterizedInjectable {
                            name: target.class_or_function_name.clone(),
                        }
                        .at(target_injectable.source_location().clone()));
                    }
                    graph.add_edge(identifier.clone(), required.clone());
                    DependencyType::Internal(InternalDependency {
                        identifier: required.clone(),
                    })
                } else if is_container_reference(container, required) {
                    DependencyType::Container(ContainerDependency {
                        container_name: container.container_name.clone(),
                    })
                } else {
                    debug!(
                        container = %container.container_name,
                        slot = %required,
                        "slot not declared in container, promoted to external"
                    );
                    let external = ExternalDependency {
                        identifier: required.clone(),
                    };
                    let _ = external_dependencies.insert(required.clone(), external.clone());
                    DependencyType::External(external)
                };

                let _ = consumed.insert(required.clone(), dependency_type);
            }

            let _ = dependencies.insert(
                identifier.clone(),
                ResolvedDependency {
                    definition: definition.clone(),
                    injectable: injectable.clone(),
                    dependencies: consumed,
                },
            );
        }

        if let Err(path) = graph.verify_cycle() {
            let path = path
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(" > ");
            return Err(
                WiringErrorKind::DependencyCycle { path }.at(container.source_location.clone())
            );
        }

        verify_generated_names(container, &dependencies, &external_dependencies)?;

        Ok(Self {
            container_name: container.container_name.clone(),
            container_protocol_name: container.container_protocol_name.clone(),
            access_level: container.access_level,
            dependencies,
            external_dependencies,
            source_location: container.source_location.clone(),
        })
    }
}

/// Resolves every container declared across the given sources, in container
/// name order.
///
/// # Errors
///
/// Fails when `sources` is empty, when indexing finds duplicate injectables
/// or containers, when no container is declared, or when any single
/// container fails to resolve.
pub fn resolve(sources: &[SourceDefinition]) -> Result<Vec<ResolvedContainer>> {
    if sources.is_empty() {
        return Err(WiringError::MissingSources);
    }

    let injectables = InjectableCollection::from_sources(sources)?;
    let containers = ContainerCollection::from_sources(sources)?;

    let mut resolved = Vec::with_capacity(containers.len());
    for container in containers.iter() {
        let container = ResolvedContainer::resolve(container, &injectables)?;
        info!(
            container = %container.container_name,
            dependencies = container.dependencies.len(),
            externals = container.external_dependencies.len(),
            "resolved container"
        );
        resolved.push(container);
    }

    Ok(resolved)
}

type Matched = BTreeMap<DependencyIdentifier, (DependencyDefinition, Injectable)>;

/// First pass: match declarations to injectables and normalize identifiers.
fn match_definitions(
    container: &ContainerDefinition,
    injectables: &InjectableCollection,
) -> Result<Matched> {
    let mut matched: Matched = BTreeMap::new();

    for definition in container.dependencies() {
        let binding = match &definition.binding_type {
            BindingType::Binding(binding) => binding.clone(),
            BindingType::Instance => BindingName::new(definition.class_or_function_name.as_str()),
        };

        let injectable = injectables
            .lookup(&binding, &definition.class_or_function_name)
            .ok_or_else(|| {
                WiringErrorKind::MissingInjectable {
                    class_or_function: definition.class_or_function_name.clone(),
                    binding: binding.clone(),
                }
                .at(definition.source_location.clone())
            })?
            .clone();

        // A bare function name declared with instance/singleton is shorthand
        // for the function's return binding; the disambiguating name is kept.
        let definition = match (&definition.binding_type, &injectable) {
            (BindingType::Instance, Injectable::Function(function)) => {
                definition.clone().with_identifier(DependencyIdentifier::new(
                    function.binding_name.clone(),
                    definition.identifier.name.clone(),
                ))
            }
            _ => definition.clone(),
        };

        if definition.kind == DependencyKind::Singleton && injectable.has_parameters() {
            return Err(WiringErrorKind::SingletonWithParameters {
                name: definition.class_or_function_name.clone(),
            }
            .at(injectable.source_location().clone()));
        }

        let _ = matched.insert(definition.identifier.clone(), (definition, injectable));
    }

    Ok(matched)
}

/// An unnamed slot whose binding is the container's own name or the protocol
/// it was declared on resolves to the container itself.
fn is_container_reference(
    container: &ContainerDefinition,
    identifier: &DependencyIdentifier,
) -> bool {
    identifier.name.is_none()
        && (identifier.binding_name.as_str() == container.container_name.as_str()
            || identifier.binding_name == container.container_protocol_name)
}

/// Rejects distinct identifiers that would collide on a generated name.
fn verify_generated_names(
    container: &ContainerDefinition,
    dependencies: &BTreeMap<DependencyIdentifier, ResolvedDependency>,
    externals: &BTreeMap<DependencyIdentifier, ExternalDependency>,
) -> Result<()> {
    let mut seen: BTreeSet<String> = BTreeSet::new();
    let mut verify = |name: String| {
        if seen.insert(name.clone()) {
            Ok(())
        } else {
            Err(WiringErrorKind::MultipleItemsNamed { name }
                .at(container.source_location.clone()))
        }
    };

    for resolved in dependencies.values() {
        verify(resolved.definition.build_function_name())?;
        if resolved.definition.kind == DependencyKind::Singleton {
            verify(resolved.definition.singleton_name())?;
        }
    }
    for external in externals.values() {
        verify(external.closure_name())?;
        verify(external.parameter_name())?;
    }

    Ok(())
}
