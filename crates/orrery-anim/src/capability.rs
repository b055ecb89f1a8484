//! Render capability detection.
//!
//! The probe runs once per process; every later call gets the memoized
//! answer.

use std::io::IsTerminal;
use std::sync::OnceLock;

use log::debug;

/// How poses are painted, best first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransformProperty {
    /// 24-bit RGB colors.
    TrueColor,
    /// The xterm 256-color palette.
    Ansi256,
    /// The sixteen named ANSI colors.
    Ansi16,
}

impl TransformProperty {
    /// Probe order.
    pub const CANDIDATES: [TransformProperty; 3] = [
        TransformProperty::TrueColor,
        TransformProperty::Ansi256,
        TransformProperty::Ansi16,
    ];

    pub fn name(self) -> &'static str {
        match self {
            TransformProperty::TrueColor => "truecolor",
            TransformProperty::Ansi256 => "ansi256",
            TransformProperty::Ansi16 => "ansi",
        }
    }

    fn supported_by<F>(self, env: &F, term: &str) -> bool
    where
        F: Fn(&str) -> Option<String>,
    {
        match self {
            TransformProperty::TrueColor => env("COLORTERM").is_some_and(|value| {
                matches!(value.to_ascii_lowercase().as_str(), "truecolor" | "24bit")
            }),
            TransformProperty::Ansi256 => term.contains("256color"),
            TransformProperty::Ansi16 => !term.is_empty() || cfg!(windows),
        }
    }
}

/// Result of the capability probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransformSupport {
    Unsupported,
    SupportedAs(TransformProperty),
}

impl TransformSupport {
    /// Probe the current process environment, once.
    pub fn detect() -> Self {
        static SUPPORT: OnceLock<TransformSupport> = OnceLock::new();
        *SUPPORT.get_or_init(|| {
            let support = probe_with(
                |key| std::env::var(key).ok(),
                std::io::stdout().is_terminal(),
            );
            debug!("transform support resolved to {support:?}");
            support
        })
    }

    pub fn property(self) -> Option<TransformProperty> {
        match self {
            TransformSupport::Unsupported => None,
            TransformSupport::SupportedAs(property) => Some(property),
        }
    }

    pub fn is_supported(self) -> bool {
        self.property().is_some()
    }
}

/// Probe with an explicit environment lookup.
///
/// Output that is not a terminal, or a `dumb` one, supports nothing.
pub fn probe_with<F>(env: F, is_terminal: bool) -> TransformSupport
where
    F: Fn(&str) -> Option<String>,
{
    if !is_terminal {
        return TransformSupport::Unsupported;
    }
    let term = env("TERM").unwrap_or_default();
    if term == "dumb" {
        return TransformSupport::Unsupported;
    }
    TransformProperty::CANDIDATES
        .into_iter()
        .find(|property| property.supported_by(&env, &term))
        .map_or(TransformSupport::Unsupported, TransformSupport::SupportedAs)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env_of(pairs: &'static [(&'static str, &'static str)]) -> impl Fn(&str) -> Option<String> {
        move |key| {
            pairs
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.to_string())
        }
    }

    #[test]
    fn test_truecolor_wins() {
        let env = env_of(&[("TERM", "xterm-256color"), ("COLORTERM", "truecolor")]);
        assert_eq!(
            probe_with(env, true),
            TransformSupport::SupportedAs(TransformProperty::TrueColor)
        );
    }

    #[test]
    fn test_24bit_alias() {
        let env = env_of(&[("TERM", "xterm"), ("COLORTERM", "24BIT")]);
        assert_eq!(
            probe_with(env, true).property(),
            Some(TransformProperty::TrueColor)
        );
    }

    #[test]
    fn test_256_color() {
        let env = env_of(&[("TERM", "screen-256color")]);
        assert_eq!(
            probe_with(env, true).property(),
            Some(TransformProperty::Ansi256)
        );
    }

    #[test]
    fn test_basic_ansi() {
        let env = env_of(&[("TERM", "vt100")]);
        assert_eq!(
            probe_with(env, true).property(),
            Some(TransformProperty::Ansi16)
        );
    }

    #[test]
    fn test_dumb_terminal_unsupported() {
        let env = env_of(&[("TERM", "dumb"), ("COLORTERM", "truecolor")]);
        assert_eq!(probe_with(env, true), TransformSupport::Unsupported);
    }

    #[test]
    fn test_not_a_terminal_unsupported() {
        let env = env_of(&[("TERM", "xterm-256color")]);
        assert!(!probe_with(env, false).is_supported());
    }

    #[test]
    fn test_detect_is_memoized() {
        assert_eq!(TransformSupport::detect(), TransformSupport::detect());
    }
}
