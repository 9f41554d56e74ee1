//! Indexes over the declarations supplied by the front end.
//!
//! [`InjectableCollection`] answers the resolution engine's lookups by
//! (binding name, class-or-function name); [`ContainerCollection`] holds the
//! containers to resolve, in name order for deterministic output.

use std::collections::{BTreeMap, HashMap};

use wiregen_common::types::{BindingName, ClassOrFunctionName};

use crate::definitions::{ContainerDefinition, SourceDefinition};
use crate::error::{Result, WiringError, WiringErrorKind};
use crate::injectable::Injectable;

/// Injectables indexed by every binding name they can satisfy.
#[derive(Debug, Clone, Default)]
pub struct InjectableCollection {
    by_binding: HashMap<BindingName, HashMap<ClassOrFunctionName, Injectable>>,
}

impl InjectableCollection {
    /// Indexes every injectable found in the given sources.
    ///
    /// A class is registered under each name in its inheritance chain plus
    /// its own class name. A function is registered under its return-binding
    /// name plus its own function name, so `instance(functionName)` and
    /// `singleton(functionName)` shorthands can find it.
    ///
    /// # Errors
    ///
    /// Fails when two injectables land on an identical (binding, name) pair.
    pub fn from_sources(sources: &[SourceDefinition]) -> Result<Self> {
        let mut by_binding: HashMap<BindingName, HashMap<ClassOrFunctionName, Injectable>> =
            HashMap::new();

        for class in sources.iter().flat_map(|s| &s.injectable_classes) {
            let mut names = class.inheritance_chain.clone();
            names.push(BindingName::new(class.class_name.as_str()));

            for binding in names {
                let entries = by_binding.entry(binding.clone()).or_default();
                if let Some(existing) = entries.get(&class.class_name) {
                    return Err(WiringErrorKind::DuplicateInjectable {
                        binding,
                        existing: existing.class_or_function_name().clone(),
                    }
                    .at(class.source_location.clone()));
                }
                let _ = entries.insert(
                    class.class_name.clone(),
                    Injectable::Class(class.clone()),
                );
            }
        }

        for function in sources.iter().flat_map(|s| &s.injectable_functions) {
            let names = [
                function.binding_name.clone(),
                BindingName::new(function.function_name.as_str()),
            ];

            for binding in names {
                let entries = by_binding.entry(binding.clone()).or_default();
                if let Some(existing) = entries.get(&function.function_name) {
                    return Err(WiringErrorKind::DuplicateInjectable {
                        binding,
                        existing: existing.class_or_function_name().clone(),
                    }
                    .at(function.source_location.clone()));
                }
                let _ = entries.insert(
                    function.function_name.clone(),
                    Injectable::Function(function.clone()),
                );
            }
        }

        Ok(Self { by_binding })
    }

    /// Looks up an injectable by the compound (binding, name) key.
    #[must_use]
    pub fn lookup(
        &self,
        binding: &BindingName,
        name: &ClassOrFunctionName,
    ) -> Option<&Injectable> {
        self.by_binding.get(binding)?.get(name)
    }
}

/// Container definitions indexed by name, iterated in name order.
#[derive(Debug, Clone)]
pub struct ContainerCollection {
    containers: BTreeMap<wiregen_common::types::ContainerName, ContainerDefinition>,
}

impl ContainerCollection {
    /// Indexes every container found in the given sources.
    ///
    /// # Errors
    ///
    /// Fails when two containers share a name, or when the sources declare
    /// no container at all.
    pub fn from_sources(sources: &[SourceDefinition]) -> Result<Self> {
        let mut containers = BTreeMap::new();

        for container in sources.iter().flat_map(|s| &s.containers) {
            let name = container.container_name.clone();
            if containers.contains_key(&name) {
                return Err(WiringErrorKind::DuplicateContainer { name }
                    .at(container.source_location.clone()));
            }
            let _ = containers.insert(name, container.clone());
        }

        if containers.is_empty() {
            return Err(WiringError::MissingContainers);
        }

        Ok(Self { containers })
    }

    /// Containers in name order.
    pub fn iter(&self) -> impl Iterator<Item = &ContainerDefinition> {
        self.containers.values()
    }

    /// Number of indexed containers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.containers.len()
    }

    /// `true` when no container is indexed; unreachable after a successful
    /// [`Self::from_sources`].
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.containers.is_empty()
    }
}
