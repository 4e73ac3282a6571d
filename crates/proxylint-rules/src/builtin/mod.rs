//! Built-in rules for Dev Proxy config files
//!
//! Every rule is a plain function over the parsed document root. Rules never
//! share state; the registry below only fixes the order in which their
//! diagnostics are reported.

use std::fmt;

use proxylint_core::query::{is_enabled, property};
use proxylint_core::{Diagnostic, DiagnosticCode, ObjectNode, PropertyNode};

use crate::engine::LintContext;

pub mod config_sections;
pub mod language_model;
pub mod plugins;
pub mod schema;
pub mod urls;

/// Signature shared by every built-in rule
pub type RuleCheck = fn(&ObjectNode, &LintContext<'_>) -> Vec<Diagnostic>;

/// A registered rule and the codes it can emit
#[derive(Clone, Copy)]
pub struct RuleDescriptor {
    /// Stable rule name, e.g. `plugin-config`
    pub name: &'static str,
    pub codes: &'static [DiagnosticCode],
    pub description: &'static str,
    pub check: RuleCheck,
}

impl RuleDescriptor {
    pub fn run(&self, root: &ObjectNode, context: &LintContext<'_>) -> Vec<Diagnostic> {
        (self.check)(root, context)
    }

    pub fn emits(&self, code: DiagnosticCode) -> bool {
        self.codes.contains(&code)
    }
}

impl fmt::Debug for RuleDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleDescriptor")
            .field("name", &self.name)
            .field("codes", &self.codes)
            .finish()
    }
}

/// Collection of built-in rules
pub struct BuiltinRules;

impl BuiltinRules {
    /// Every built-in rule in reporting order
    pub fn all() -> Vec<RuleDescriptor> {
        vec![
            RuleDescriptor {
                name: "schema-compatibility",
                codes: &[DiagnosticCode::InvalidSchema],
                description: "The document $schema must match the installed Dev Proxy version",
                check: schema::check_schema_compatibility,
            },
            RuleDescriptor {
                name: "enabled-plugins",
                codes: &[DiagnosticCode::NoEnabledPlugins],
                description: "The plugins array must contain at least one enabled plugin",
                check: plugins::check_enabled_plugins,
            },
            RuleDescriptor {
                name: "reporter-position",
                codes: &[DiagnosticCode::ReporterPosition],
                description: "Reporter plugins must come after every other plugin",
                check: plugins::check_reporter_position,
            },
            RuleDescriptor {
                name: "plugin-config",
                codes: &[
                    DiagnosticCode::PluginConfigRequired,
                    DiagnosticCode::PluginConfigNotRequired,
                    DiagnosticCode::PluginConfigOptional,
                    DiagnosticCode::PluginConfigMissing,
                ],
                description: "A plugin's configSection must agree with what the plugin supports",
                check: plugins::check_plugin_configurations,
            },
            RuleDescriptor {
                name: "summary-without-reporter",
                codes: &[DiagnosticCode::SummaryWithoutReporter],
                description: "Summary plugins need an enabled reporter to produce output",
                check: plugins::check_summary_without_reporter,
            },
            RuleDescriptor {
                name: "api-center-order",
                codes: &[DiagnosticCode::ApiCenterPluginOrder],
                description: "OpenApiSpecGeneratorPlugin must run before ApiCenterOnboardingPlugin",
                check: plugins::check_api_center_order,
            },
            RuleDescriptor {
                name: "deprecated-plugin-path",
                codes: &[DiagnosticCode::DeprecatedPluginPath],
                description: "The pre-0.29 plugin assembly path is no longer shipped",
                check: plugins::check_deprecated_plugin_path,
            },
            RuleDescriptor {
                name: "orphaned-config-section",
                codes: &[DiagnosticCode::InvalidConfigSection],
                description: "Every config section must be referenced by a plugin",
                check: config_sections::check_orphaned_config_sections,
            },
            RuleDescriptor {
                name: "config-section-schema",
                codes: &[DiagnosticCode::InvalidConfigSectionSchema],
                description: "Config section $schema URLs must match the installed Dev Proxy version",
                check: schema::check_config_section_schemas,
            },
            RuleDescriptor {
                name: "language-model",
                codes: &[DiagnosticCode::MissingLanguageModel],
                description: "Plugins that call a language model need languageModel.enabled",
                check: language_model::check_language_model_requirements,
            },
            RuleDescriptor {
                name: "urls-to-watch",
                codes: &[DiagnosticCode::EmptyUrlsToWatch],
                description: "An empty urlsToWatch list intercepts nothing",
                check: urls::check_urls_to_watch,
            },
        ]
    }

    /// Rule that emits `code`, if any
    pub fn for_code(code: DiagnosticCode) -> Option<RuleDescriptor> {
        Self::all().into_iter().find(|rule| rule.emits(code))
    }
}

/// A plugin entry from the `plugins` array
#[derive(Debug, Clone, Copy)]
pub(crate) struct PluginEntry<'a> {
    pub node: &'a ObjectNode,
}

impl<'a> PluginEntry<'a> {
    /// Entries of the top-level `plugins` array, or `None` when it is absent
    /// or not an array
    pub fn all(root: &'a ObjectNode) -> Option<Vec<PluginEntry<'a>>> {
        proxylint_core::query::plugin_objects(root)
            .map(|nodes| nodes.into_iter().map(|node| PluginEntry { node }).collect())
    }

    pub fn name_property(&self) -> Option<&'a PropertyNode> {
        property(self.node, "name")
    }

    pub fn name(&self) -> Option<&'a str> {
        self.name_property().and_then(|prop| prop.value.as_str())
    }

    pub fn is_enabled(&self) -> bool {
        is_enabled(self.node)
    }

    pub fn is_reporter(&self) -> bool {
        self.name()
            .is_some_and(|name| name.to_lowercase().contains("reporter"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_code_has_exactly_one_rule_or_is_async() {
        let rules = BuiltinRules::all();
        for code in DiagnosticCode::ALL {
            let owners = rules.iter().filter(|rule| rule.emits(*code)).count();
            match code {
                DiagnosticCode::UnknownConfigProperty | DiagnosticCode::InvalidConfigValue => {
                    assert_eq!(owners, 0, "{code} is produced by the schema phase")
                }
                _ => assert_eq!(owners, 1, "{code} should belong to one rule"),
            }
        }
    }

    #[test]
    fn rule_names_are_unique() {
        let rules = BuiltinRules::all();
        let mut names: Vec<_> = rules.iter().map(|rule| rule.name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), rules.len());
    }

    #[test]
    fn lookup_by_code() {
        let rule = BuiltinRules::for_code(DiagnosticCode::PluginConfigMissing).unwrap();
        assert_eq!(rule.name, "plugin-config");
        assert!(BuiltinRules::for_code(DiagnosticCode::InvalidConfigValue).is_none());
    }
}
