//! Parameter name resolution: explicit declarations, recorded implicit
//! names, pluggable providers and name transforms.

use crate::candidate::CreatorCandidate;

/// Transform applied to implicit names at resolution time. Explicit
/// names always bind verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NameTransform {
    #[default]
    Identity,
    SnakeCase,
    KebabCase,
    CamelCase,
    PascalCase,
    LowerCase,
}

impl NameTransform {
    pub fn as_str(&self) -> &'static str {
        match self {
            NameTransform::Identity => "identity",
            NameTransform::SnakeCase => "snake_case",
            NameTransform::KebabCase => "kebab-case",
            NameTransform::CamelCase => "camelCase",
            NameTransform::PascalCase => "PascalCase",
            NameTransform::LowerCase => "lowercase",
        }
    }

    pub fn apply(&self, name: &str) -> String {
        if matches!(self, NameTransform::Identity) {
            return name.to_string();
        }
        let words = split_words(name);
        match self {
            NameTransform::Identity => unreachable!(),
            NameTransform::SnakeCase => words.join("_"),
            NameTransform::KebabCase => words.join("-"),
            NameTransform::LowerCase => words.concat(),
            NameTransform::CamelCase => {
                let mut out = String::new();
                for (i, word) in words.iter().enumerate() {
                    if i == 0 {
                        out.push_str(word);
                    } else {
                        out.push_str(&capitalize(word));
                    }
                }
                out
            }
            NameTransform::PascalCase => {
                words.iter().map(|w| capitalize(w)).collect()
            }
        }
    }
}

/// Splits an identifier into lowercase words on `_`, `-`, spaces and
/// case boundaries. Runs of uppercase stay together until a lowercase
/// letter follows, so `HTTPServer` splits as `http`, `server`.
fn split_words(name: &str) -> Vec<String> {
    let chars: Vec<char> = name.chars().collect();
    let mut words = Vec::new();
    let mut current = String::new();
    for (i, &c) in chars.iter().enumerate() {
        if c == '_' || c == '-' || c == ' ' {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            continue;
        }
        if c.is_uppercase() && !current.is_empty() {
            let prev = chars[i - 1];
            let starts_word = prev.is_lowercase()
                || prev.is_ascii_digit()
                || chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            if starts_word {
                words.push(std::mem::take(&mut current));
            }
        }
        current.extend(c.to_lowercase());
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Where a resolved parameter name came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameSource {
    Explicit,
    Implicit,
}

/// Outcome of name resolution for one parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedName {
    pub name: String,
    pub source: NameSource,
}

/// Pluggable source of implicit parameter names, consulted before the
/// name recorded on the parameter itself.
pub trait ImplicitNames: Send + Sync {
    /// Implicit name for parameter `index` of `candidate` on the type
    /// called `type_name`, or `None` to fall through.
    fn implicit_name(
        &self,
        type_name: &str,
        candidate: &CreatorCandidate,
        index: usize,
    ) -> Option<String>;
}

/// Resolves the binding name of one parameter: explicit declaration
/// first, then provider-supplied or recorded implicit name with the
/// transform applied. `None` when nothing resolves.
pub fn resolve_param_name(
    type_name: &str,
    candidate: &CreatorCandidate,
    index: usize,
    transform: NameTransform,
    provider: Option<&dyn ImplicitNames>,
) -> Option<ResolvedName> {
    let param = &candidate.params[index];
    if let Some(name) = &param.explicit {
        return Some(ResolvedName {
            name: name.clone(),
            source: NameSource::Explicit,
        });
    }
    provider
        .and_then(|p| p.implicit_name(type_name, candidate, index))
        .or_else(|| param.implicit.clone())
        .map(|name| ResolvedName {
            name: transform.apply(&name),
            source: NameSource::Implicit,
        })
}
