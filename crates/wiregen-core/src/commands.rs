//! Interpretation of parsed command trees into the wiring command set.
//!
//! The parser produces a generic tree; this module closes it over the
//! recognized commands, verifying names, argument counts, and bodies.

use wiregen_common::types::{AccessLevel, BindingName, ClassOrFunctionName, ContainerName, Name};

use crate::error::CommandError;
use crate::parser::{self, ast::Command};

/// A fully interpreted top-level wiring command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WiringCommand {
    /// The comment carries no tagged command at all.
    Empty,
    /// Marks a class or factory function as injectable.
    Inject,
    /// Marks a parameter as a dependency slot, optionally disambiguated.
    Dependency {
        /// Optional disambiguating name.
        name: Option<Name>,
    },
    /// Declares a container and its bindings.
    Container {
        /// Name of the generated container.
        name: ContainerName,
        /// Body commands, in declaration order.
        commands: Vec<ContainerCommand>,
    },
}

/// A command inside a `container(...)` body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContainerCommand {
    /// Sets the access level of the generated container.
    Access(AccessLevel),
    /// Binds a class to a protocol, built fresh on every request.
    Bind {
        /// Implementing class.
        class: ClassOrFunctionName,
        /// Protocol the binding satisfies.
        binding: BindingName,
        /// Optional modifiers from the command body.
        modifiers: BindingModifiers,
    },
    /// Binds a class to a protocol, built once and cached.
    SingletonBind {
        /// Implementing class.
        class: ClassOrFunctionName,
        /// Protocol the binding satisfies.
        binding: BindingName,
        /// Optional modifiers from the command body.
        modifiers: BindingModifiers,
    },
    /// Declares a class or factory function under its own name, built fresh.
    Instance {
        /// Class or factory function name.
        class: ClassOrFunctionName,
        /// Optional modifiers from the command body.
        modifiers: BindingModifiers,
    },
    /// Declares a class or factory function under its own name, cached.
    Singleton {
        /// Class or factory function name.
        class: ClassOrFunctionName,
        /// Optional modifiers from the command body.
        modifiers: BindingModifiers,
    },
}

/// Modifiers carried by the optional body of a binding command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BindingModifiers {
    /// Access level of the generated factory, `access(...)`.
    pub access: Option<AccessLevel>,
    /// Disambiguating name of the dependency slot, `name(...)`.
    pub name: Option<Name>,
}

/// How a command's body is constrained.
enum BodyRule {
    Forbidden,
    Required,
    Optional,
}

/// Resolves one comment fragment into a wiring command.
///
/// A fragment without a tagged command resolves to [`WiringCommand::Empty`];
/// that is not an error.
///
/// # Errors
///
/// Fails on malformed command text, more than one top-level command, an
/// unrecognized command name, a bad argument count, or a body constraint
/// violation.
pub fn resolve(text: &str, tag: &str) -> Result<WiringCommand, CommandError> {
    let mut parsed = parser::parse(text, tag)?;

    if parsed.is_empty() {
        return Ok(WiringCommand::Empty);
    }
    if parsed.len() > 1 {
        return Err(CommandError::MultipleCommands);
    }

    let command = parsed.remove(0).command;

    match command.name.as_str() {
        "inject" => {
            verify_command(&command, "inject", 0, 0, &BodyRule::Forbidden)?;
            Ok(WiringCommand::Inject)
        }
        "dependency" => {
            verify_command(&command, "dependency", 0, 1, &BodyRule::Forbidden)?;
            Ok(WiringCommand::Dependency {
                name: command.arguments.first().map(Name::new),
            })
        }
        "container" => {
            verify_command(&command, "container", 1, 1, &BodyRule::Required)?;
            let commands = command
                .body
                .iter()
                .map(resolve_container_command)
                .collect::<Result<Vec<_>, _>>()?;
            Ok(WiringCommand::Container {
                name: ContainerName::new(&command.arguments[0]),
                commands,
            })
        }
        other => Err(CommandError::UnrecognizedCommand(other.to_owned())),
    }
}

fn resolve_container_command(command: &Command) -> Result<ContainerCommand, CommandError> {
    match command.name.as_str() {
        "access" => {
            verify_command(command, "access", 1, 1, &BodyRule::Forbidden)?;
            Ok(ContainerCommand::Access(parse_access_level(
                &command.arguments[0],
            )?))
        }
        "bind" => {
            verify_command(command, "bind", 2, 2, &BodyRule::Optional)?;
            Ok(ContainerCommand::Bind {
                class: ClassOrFunctionName::new(&command.arguments[0]),
                binding: BindingName::new(&command.arguments[1]),
                modifiers: resolve_modifiers("bind", &command.body)?,
            })
        }
        "singletonBind" => {
            verify_command(command, "singletonBind", 2, 2, &BodyRule::Optional)?;
            Ok(ContainerCommand::SingletonBind {
                class: ClassOrFunctionName::new(&command.arguments[0]),
                binding: BindingName::new(&command.arguments[1]),
                modifiers: resolve_modifiers("singletonBind", &command.body)?,
            })
        }
        "instance" => {
            verify_command(command, "instance", 1, 1, &BodyRule::Optional)?;
            Ok(ContainerCommand::Instance {
                class: ClassOrFunctionName::new(&command.arguments[0]),
                modifiers: resolve_modifiers("instance", &command.body)?,
            })
        }
        "singleton" => {
            verify_command(command, "singleton", 1, 1, &BodyRule::Optional)?;
            Ok(ContainerCommand::Singleton {
                class: ClassOrFunctionName::new(&command.arguments[0]),
                modifiers: resolve_modifiers("singleton", &command.body)?,
            })
        }
        other => Err(CommandError::UnrecognizedCommand(other.to_owned())),
    }
}

fn resolve_modifiers(
    parent: &'static str,
    body: &[Command],
) -> Result<BindingModifiers, CommandError> {
    let mut modifiers = BindingModifiers::default();

    for command in body {
        match command.name.as_str() {
            "access" => {
                verify_command(command, "access", 1, 1, &BodyRule::Forbidden)?;
                if modifiers.access.is_some() {
                    return Err(CommandError::DuplicateModifier {
                        command: parent,
                        modifier: "access",
                    });
                }
                modifiers.access = Some(parse_access_level(&command.arguments[0])?);
            }
            "name" => {
                verify_command(command, "name", 1, 1, &BodyRule::Forbidden)?;
                if modifiers.name.is_some() {
                    return Err(CommandError::DuplicateModifier {
                        command: parent,
                        modifier: "name",
                    });
                }
                modifiers.name = Some(Name::new(&command.arguments[0]));
            }
            other => return Err(CommandError::UnrecognizedCommand(other.to_owned())),
        }
    }

    Ok(modifiers)
}

fn parse_access_level(argument: &str) -> Result<AccessLevel, CommandError> {
    AccessLevel::from_identifier(argument)
        .ok_or_else(|| CommandError::UnknownAccessLevel(argument.to_owned()))
}

fn verify_command(
    command: &Command,
    name: &'static str,
    min: usize,
    max: usize,
    body: &BodyRule,
) -> Result<(), CommandError> {
    let found = command.arguments.len();
    if found < min || found > max {
        return Err(CommandError::InvalidArgumentCount {
            command: name,
            min,
            max,
            found,
        });
    }

    match body {
        BodyRule::Forbidden if !command.body.is_empty() => {
            Err(CommandError::UnexpectedBody { command: name })
        }
        BodyRule::Required if command.body.is_empty() => {
            Err(CommandError::MissingBody { command: name })
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TAG: &str = "wiring:";

    #[test]
    fn untagged_comment_resolves_to_empty() {
        let command = resolve("just documentation", TAG).expect("should resolve");
        assert_eq!(command, WiringCommand::Empty);
    }

    #[test]
    fn inject_resolves() {
        let command = resolve("wiring: inject", TAG).expect("should resolve");
        assert_eq!(command, WiringCommand::Inject);
    }

    #[test]
    fn inject_with_argument_fails() {
        let err = resolve("wiring: inject(Logger)", TAG).unwrap_err();
        assert!(matches!(
            err,
            CommandError::InvalidArgumentCount {
                command: "inject",
                found: 1,
                ..
            }
        ));
    }

    #[test]
    fn inject_with_body_fails() {
        let err = resolve("wiring: inject { access(public) }", TAG).unwrap_err();
        assert_eq!(err, CommandError::UnexpectedBody { command: "inject" });
    }

    #[test]
    fn dependency_without_name_resolves() {
        let command = resolve("wiring: dependency", TAG).expect("should resolve");
        assert_eq!(command, WiringCommand::Dependency { name: None });
    }

    #[test]
    fn dependency_with_name_resolves() {
        let command = resolve("wiring: dependency(primary)", TAG).expect("should resolve");
        assert_eq!(
            command,
            WiringCommand::Dependency {
                name: Some(Name::new("primary")),
            }
        );
    }

    #[test]
    fn dependency_with_two_arguments_fails() {
        let err = resolve("wiring: dependency(a, b)", TAG).unwrap_err();
        assert!(matches!(
            err,
            CommandError::InvalidArgumentCount {
                command: "dependency",
                min: 0,
                max: 1,
                found: 2,
            }
        ));
    }

    #[test]
    fn container_without_body_fails() {
        let err = resolve("wiring: container(AppContainer)", TAG).unwrap_err();
        assert_eq!(err, CommandError::MissingBody { command: "container" });
    }

    #[test]
    fn container_resolves_all_binding_commands() {
        let command = resolve(
            "wiring: container(AppContainer) {
                access(public)
                bind(PrintLogger, Logger)
                singletonBind(SessionManager, SessionManaging)
                instance(IntroViewModel)
                singleton(NetworkManager)
            }",
            TAG,
        )
        .expect("should resolve");

        let WiringCommand::Container { name, commands } = command else {
            panic!("expected a container command");
        };
        assert_eq!(name, ContainerName::new("AppContainer"));
        assert_eq!(commands.len(), 5);
        assert_eq!(commands[0], ContainerCommand::Access(AccessLevel::Public));
        assert_eq!(
            commands[1],
            ContainerCommand::Bind {
                class: ClassOrFunctionName::new("PrintLogger"),
                binding: BindingName::new("Logger"),
                modifiers: BindingModifiers::default(),
            }
        );
        assert!(matches!(commands[2], ContainerCommand::SingletonBind { .. }));
        assert!(matches!(commands[3], ContainerCommand::Instance { .. }));
        assert!(matches!(commands[4], ContainerCommand::Singleton { .. }));
    }

    #[test]
    fn binding_modifiers_resolve() {
        let command = resolve(
            "wiring: container(AppContainer) {
                bind(PrintLogger, Logger) {
                    name(primary)
                    access(public)
                }
            }",
            TAG,
        )
        .expect("should resolve");

        let WiringCommand::Container { commands, .. } = command else {
            panic!("expected a container command");
        };
        assert_eq!(
            commands[0],
            ContainerCommand::Bind {
                class: ClassOrFunctionName::new("PrintLogger"),
                binding: BindingName::new("Logger"),
                modifiers: BindingModifiers {
                    access: Some(AccessLevel::Public),
                    name: Some(Name::new("primary")),
                },
            }
        );
    }

    #[test]
    fn repeated_modifier_fails() {
        let err = resolve(
            "wiring: container(App) {
                singleton(NetworkManager) {
                    name(a)
                    name(b)
                }
            }",
            TAG,
        )
        .unwrap_err();
        assert_eq!(
            err,
            CommandError::DuplicateModifier {
                command: "singleton",
                modifier: "name",
            }
        );
    }

    #[test]
    fn unknown_access_level_fails() {
        let err = resolve(
            "wiring: container(App) { access(fileprivate) bind(A, B) }",
            TAG,
        )
        .unwrap_err();
        assert_eq!(err, CommandError::UnknownAccessLevel("fileprivate".into()));
    }

    #[test]
    fn unknown_top_level_command_fails() {
        let err = resolve("wiring: provide(Logger)", TAG).unwrap_err();
        assert_eq!(err, CommandError::UnrecognizedCommand("provide".into()));
    }

    #[test]
    fn unknown_container_command_fails() {
        let err = resolve("wiring: container(App) { provide(Logger) }", TAG).unwrap_err();
        assert_eq!(err, CommandError::UnrecognizedCommand("provide".into()));
    }

    #[test]
    fn two_top_level_commands_fail() {
        let err = resolve("wiring: inject\nwiring: dependency", TAG).unwrap_err();
        assert_eq!(err, CommandError::MultipleCommands);
    }

    #[test]
    fn syntax_error_surfaces_as_parse_error() {
        let err = resolve("wiring: bind(A", TAG).unwrap_err();
        assert!(matches!(err, CommandError::Parse(_)));
    }
}
