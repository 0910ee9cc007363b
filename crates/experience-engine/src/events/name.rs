/// Namespace used when a token does not name one.
pub const BASE_NAMESPACE: &str = "base";

/// A resolved `event[.namespace]` token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventToken {
    /// Event name; empty when the token only addresses a namespace.
    pub event: String,
    pub namespace: String,
}

impl EventToken {
    pub fn is_base(&self) -> bool {
        self.namespace == BASE_NAMESPACE
    }

    /// True for `.namespace` tokens that target every event of a namespace.
    pub fn is_namespace_only(&self) -> bool {
        self.event.is_empty() && !self.is_base()
    }

    fn parse(raw: &str) -> Self {
        let mut parts = raw.split('.');
        let event = parts.next().unwrap_or_default().to_string();
        let namespace = match parts.next() {
            Some(ns) if !ns.is_empty() => ns.to_string(),
            _ => BASE_NAMESPACE.to_string(),
        };
        Self { event, namespace }
    }
}

/// Splits a name pattern into tokens.
///
/// Characters other than ASCII alphanumerics and the separators (space,
/// comma, slash, dot) are dropped first. Empty tokens are skipped.
pub fn resolve_names(pattern: &str) -> Vec<EventToken> {
    let sanitized: String = pattern
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, ' ' | ',' | '/' | '.'))
        .map(|c| if c == ',' || c == '/' { ' ' } else { c })
        .collect();

    sanitized
        .split(' ')
        .filter(|t| !t.is_empty())
        .map(EventToken::parse)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tok(event: &str, namespace: &str) -> EventToken {
        EventToken { event: event.into(), namespace: namespace.into() }
    }

    #[test]
    fn plain_name_uses_base_namespace() {
        assert_eq!(resolve_names("tick"), vec![tok("tick", BASE_NAMESPACE)]);
    }

    #[test]
    fn namespace_suffix() {
        assert_eq!(resolve_names("resize.camera"), vec![tok("resize", "camera")]);
    }

    #[test]
    fn trailing_dot_is_base() {
        assert_eq!(resolve_names("resize."), vec![tok("resize", BASE_NAMESPACE)]);
    }

    #[test]
    fn separators_split_tokens() {
        let names = resolve_names("a, b/c.ns  d");
        assert_eq!(
            names,
            vec![
                tok("a", BASE_NAMESPACE),
                tok("b", BASE_NAMESPACE),
                tok("c", "ns"),
                tok("d", BASE_NAMESPACE),
            ]
        );
    }

    #[test]
    fn strips_foreign_characters() {
        assert_eq!(resolve_names("re-size!.cam_era"), vec![tok("resize", "camera")]);
    }

    #[test]
    fn namespace_only_token() {
        let t = &resolve_names(".world")[0];
        assert!(t.is_namespace_only());
        assert_eq!(t.namespace, "world");
    }

    #[test]
    fn blank_pattern_has_no_tokens() {
        assert!(resolve_names("  ,/ ").is_empty());
        assert!(resolve_names("").is_empty());
    }
}
