//! Quick fixes for lint diagnostics
//!
//! Fix builders are looked up by [`DiagnosticCode`] in a static table. Each
//! builder re-parses the document, re-locates the node the diagnostic points
//! at and returns minimal text edits. A builder that cannot parse the
//! document returns no fix, except the language-model fix which falls back to
//! a line-based insertion.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::diagnostics::{Diagnostic, DiagnosticCode, filter_by_code, find_by_code};
use crate::edit::TextEdit;
use crate::install::{CURRENT_PLUGIN_PATH, ToolInstall};
use crate::plugins::PluginCatalog;
use crate::position::{Position, TextRange, to_end_position, to_range, to_start_position};
use crate::query::{plugin_objects, property};
use crate::snippets::{Snippet, SnippetCatalog};
use crate::syntax::{AstNode, ObjectNode, SyntaxNode, parse};

static OPTIONAL_CONFIG_MESSAGE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\w+) can be configured").unwrap());
static MISSING_CONFIG_MESSAGE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\w+) config section is missing\. Use '([^']+)' snippet").unwrap()
});

const LANGUAGE_MODEL_BLOCK: &str = "\"languageModel\": {\n    \"enabled\": true\n  }";

/// Host command to run after a fix is applied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FixCommand {
    /// Re-indent the whole document
    FormatDocument,
}

impl FixCommand {
    /// Editor command identifier
    pub fn command_id(&self) -> &'static str {
        match self {
            FixCommand::FormatDocument => "editor.action.formatDocument",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            FixCommand::FormatDocument => "Format Document",
        }
    }
}

/// A single offered fix
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuickFix {
    pub title: String,
    pub is_preferred: bool,
    /// Edits in application order; they never overlap
    pub edits: Vec<TextEdit>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<FixCommand>,
    /// Diagnostics this fix resolves
    pub diagnostics: Vec<Diagnostic>,
}

impl QuickFix {
    fn new(title: impl Into<String>, diagnostic: &Diagnostic) -> Self {
        Self {
            title: title.into(),
            is_preferred: false,
            edits: Vec::new(),
            command: None,
            diagnostics: vec![diagnostic.clone()],
        }
    }

    fn preferred(mut self) -> Self {
        self.is_preferred = true;
        self
    }

    fn with_edit(mut self, edit: TextEdit) -> Self {
        self.edits.push(edit);
        self
    }

    fn with_command(mut self, command: FixCommand) -> Self {
        self.command = Some(command);
        self
    }
}

/// Context of a fix request
#[derive(Debug, Clone, Copy)]
pub struct FixRequest<'a> {
    pub text: &'a str,
    /// Cursor or selection the fixes are requested for
    pub range: TextRange,
    /// Diagnostics attached to the request
    pub diagnostics: &'a [Diagnostic],
    /// Every diagnostic currently published for the document
    pub all_diagnostics: &'a [Diagnostic],
}

impl<'a> FixRequest<'a> {
    /// Request where the attached diagnostics are all document diagnostics
    pub fn new(text: &'a str, range: TextRange, diagnostics: &'a [Diagnostic]) -> Self {
        Self {
            text,
            range,
            diagnostics,
            all_diagnostics: diagnostics,
        }
    }
}

type FixBuilder = fn(&QuickFixProvider<'_>, &FixRequest<'_>) -> Vec<QuickFix>;

const FIX_BUILDERS: &[(DiagnosticCode, FixBuilder)] = &[
    (DiagnosticCode::InvalidSchema, invalid_schema_fixes),
    (DiagnosticCode::DeprecatedPluginPath, deprecated_plugin_path_fixes),
    (DiagnosticCode::MissingLanguageModel, language_model_fixes),
    (DiagnosticCode::PluginConfigOptional, optional_config_fixes),
    (DiagnosticCode::PluginConfigMissing, missing_config_fixes),
];

/// Maps diagnostics to quick fixes
#[derive(Debug, Clone)]
pub struct QuickFixProvider<'a> {
    install: ToolInstall,
    plugins: &'a PluginCatalog,
    snippets: &'a SnippetCatalog,
}

impl QuickFixProvider<'static> {
    /// Provider backed by the bundled plugin and snippet data
    pub fn bundled(install: ToolInstall) -> Self {
        Self::new(install, PluginCatalog::bundled(), SnippetCatalog::bundled())
    }
}

impl<'a> QuickFixProvider<'a> {
    pub fn new(
        install: ToolInstall,
        plugins: &'a PluginCatalog,
        snippets: &'a SnippetCatalog,
    ) -> Self {
        Self {
            install,
            plugins,
            snippets,
        }
    }

    /// Codes that have a fix builder
    pub fn fixable_codes() -> impl Iterator<Item = DiagnosticCode> {
        FIX_BUILDERS.iter().map(|(code, _)| *code)
    }

    pub fn is_fixable(code: DiagnosticCode) -> bool {
        FIX_BUILDERS.iter().any(|(fixable, _)| *fixable == code)
    }

    /// Every fix offered for the request; at most one is preferred
    pub fn fixes_for(&self, request: &FixRequest<'_>) -> Vec<QuickFix> {
        let mut fixes = Vec::new();
        for (code, builder) in FIX_BUILDERS {
            if request.diagnostics.iter().any(|d| d.code == *code) {
                fixes.extend(builder(self, request));
            }
        }

        let mut seen_preferred = false;
        for fix in &mut fixes {
            if fix.is_preferred {
                fix.is_preferred = !seen_preferred;
                seen_preferred = true;
            }
        }
        fixes
    }

    /// Fixes for a single code only
    pub fn fixes_for_code(&self, code: DiagnosticCode, request: &FixRequest<'_>) -> Vec<QuickFix> {
        FIX_BUILDERS
            .iter()
            .find(|(fixable, _)| *fixable == code)
            .map(|(_, builder)| builder(self, request))
            .unwrap_or_default()
    }
}

/// Range covering the whole node, quotes included
fn full_range(node: &impl AstNode) -> TextRange {
    TextRange::new(to_start_position(node), to_end_position(node))
}

/// Insert `member` as the last property of `object`
fn append_member(object: &ObjectNode, member: &str, indent: &str) -> TextEdit {
    match object.children.last() {
        Some(last) => TextEdit::insert(to_end_position(last), format!(",\n{indent}{member}")),
        None => {
            let open = to_start_position(object);
            TextEdit::insert(
                Position::new(open.line, open.character + 1),
                format!("\n{indent}{member}\n"),
            )
        }
    }
}

fn invalid_schema_fixes(provider: &QuickFixProvider<'_>, request: &FixRequest<'_>) -> Vec<QuickFix> {
    let Some(diagnostic) = find_by_code(request.diagnostics, DiagnosticCode::InvalidSchema, None)
    else {
        return Vec::new();
    };

    vec![
        QuickFix::new("Update schema", diagnostic)
            .with_edit(TextEdit::replace(
                diagnostic.range,
                provider.install.schema_url(),
            ))
            .preferred(),
    ]
}

fn deprecated_plugin_path_fixes(
    _provider: &QuickFixProvider<'_>,
    request: &FixRequest<'_>,
) -> Vec<QuickFix> {
    let Some(current) = find_by_code(
        request.diagnostics,
        DiagnosticCode::DeprecatedPluginPath,
        Some(&request.range),
    ) else {
        return Vec::new();
    };

    let single = QuickFix::new("Update plugin path", current)
        .with_edit(TextEdit::replace(current.range, CURRENT_PLUGIN_PATH));

    let all = filter_by_code(request.all_diagnostics, DiagnosticCode::DeprecatedPluginPath);
    if all.len() > 1 {
        let mut bulk = QuickFix::new("Update all plugin paths", current).preferred();
        bulk.diagnostics = all.iter().map(|d| (*d).clone()).collect();
        bulk.edits = all
            .iter()
            .map(|d| TextEdit::replace(d.range, CURRENT_PLUGIN_PATH))
            .collect();
        vec![single, bulk]
    } else {
        vec![single.preferred()]
    }
}

fn language_model_fixes(_provider: &QuickFixProvider<'_>, request: &FixRequest<'_>) -> Vec<QuickFix> {
    let Some(diagnostic) = find_by_code(
        request.diagnostics,
        DiagnosticCode::MissingLanguageModel,
        Some(&request.range),
    ) else {
        return Vec::new();
    };

    let edit = match parse(request.text) {
        Ok(root) => language_model_edit(&root),
        Err(err) => {
            debug!("Falling back to line-based languageModel insertion: {}", err);
            language_model_fallback_edit(request.text)
        }
    };

    vec![
        QuickFix::new("Add languageModel configuration", diagnostic)
            .with_edit(edit)
            .preferred(),
    ]
}

fn language_model_edit(root: &ObjectNode) -> TextEdit {
    let Some(language_model) = property(root, "languageModel") else {
        return append_member(root, LANGUAGE_MODEL_BLOCK, "  ");
    };

    match &language_model.value {
        SyntaxNode::Object(object) => match property(object, "enabled") {
            Some(enabled) => TextEdit::replace(full_range(&enabled.value), "true"),
            None => append_member(object, "\"enabled\": true", "    "),
        },
        other => TextEdit::replace(full_range(other), "{\n    \"enabled\": true\n  }"),
    }
}

/// Line-based insertion used when the document does not parse
fn language_model_fallback_edit(text: &str) -> TextEdit {
    let lines: Vec<&str> = text.split('\n').collect();
    let insert_line = lines
        .iter()
        .rposition(|line| line.contains('}'))
        .unwrap_or(lines.len().saturating_sub(1));

    let has_content_before = lines[..insert_line].iter().any(|line| {
        let line = line.trim();
        !line.is_empty() && !line.starts_with('{') && !line.starts_with("/*") && !line.starts_with('*')
    });

    let block = if has_content_before {
        format!(",\n  {LANGUAGE_MODEL_BLOCK}\n")
    } else {
        format!("  {LANGUAGE_MODEL_BLOCK}\n")
    };
    TextEdit::insert(Position::new(insert_line as u32, 0), block)
}

/// Config snippet rendered as a root member, keyed by `section`
fn render_section(snippet: &Snippet, section: &str) -> String {
    let body = snippet.render_body();
    match snippet.section_name() {
        Some(name) if name != section => {
            body.replacen(&format!("\"{name}\":"), &format!("\"{section}\":"), 1)
        }
        _ => body,
    }
}

fn optional_config_fixes(provider: &QuickFixProvider<'_>, request: &FixRequest<'_>) -> Vec<QuickFix> {
    let Some(diagnostic) = find_by_code(
        request.diagnostics,
        DiagnosticCode::PluginConfigOptional,
        Some(&request.range),
    ) else {
        return Vec::new();
    };

    let Some(plugin_name) = OPTIONAL_CONFIG_MESSAGE
        .captures(&diagnostic.message)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
    else {
        return Vec::new();
    };

    let Some(config) = provider
        .plugins
        .get(plugin_name)
        .and_then(|entry| entry.config.as_ref())
    else {
        return Vec::new();
    };
    let Some(snippet) = provider.snippets.find_by_prefix(&config.name) else {
        return Vec::new();
    };
    let Some(section) = snippet.section_name() else {
        return Vec::new();
    };

    let Ok(root) = parse(request.text) else {
        return Vec::new();
    };
    let Some(plugins) = plugin_objects(&root) else {
        return Vec::new();
    };
    let Some(target) = plugins.into_iter().find(|plugin| {
        property(plugin, "name")
            .is_some_and(|name| to_range(&name.value).intersects(&diagnostic.range))
    }) else {
        return Vec::new();
    };

    vec![
        QuickFix::new(format!("Add {plugin_name} configuration"), diagnostic)
            .with_edit(append_member(
                target,
                &format!("\"configSection\": \"{section}\""),
                "    ",
            ))
            .with_edit(append_member(&root, &render_section(snippet, section), "  "))
            .with_command(FixCommand::FormatDocument)
            .preferred(),
    ]
}

fn missing_config_fixes(provider: &QuickFixProvider<'_>, request: &FixRequest<'_>) -> Vec<QuickFix> {
    let Some(diagnostic) = find_by_code(
        request.diagnostics,
        DiagnosticCode::PluginConfigMissing,
        Some(&request.range),
    ) else {
        return Vec::new();
    };

    let Some(caps) = MISSING_CONFIG_MESSAGE.captures(&diagnostic.message) else {
        return Vec::new();
    };
    let (Some(section), Some(snippet_name)) = (caps.get(1), caps.get(2)) else {
        return Vec::new();
    };
    let section = section.as_str();

    let Some(snippet) = provider.snippets.find_by_prefix(snippet_name.as_str()) else {
        return Vec::new();
    };
    let Ok(root) = parse(request.text) else {
        return Vec::new();
    };

    vec![
        QuickFix::new(format!("Add {section} config section"), diagnostic)
            .with_edit(append_member(&root, &render_section(snippet, section), "  "))
            .with_command(FixCommand::FormatDocument)
            .preferred(),
    ]
}
