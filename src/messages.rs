use crate::error::FailureKind;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
pub enum Locale {
    #[default]
    #[value(name = "en")]
    En,
    #[value(name = "pt-br")]
    PtBr,
}

/// How lookup failures are worded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
pub enum ErrorPolicy {
    /// Every failure reads as "repository not found".
    #[default]
    Uniform,
    /// Rate limits and transport failures get their own message.
    PerKind,
}

/// User-facing strings of the lookup form.
#[derive(Debug, Clone)]
pub struct Messages {
    pub empty_input: &'static str,
    pub not_found: &'static str,
    pub rate_limited: &'static str,
    pub unreachable: &'static str,
    pub policy: ErrorPolicy,
}

impl Messages {
    pub fn new(locale: Locale, policy: ErrorPolicy) -> Self {
        match locale {
            Locale::En => Self {
                empty_input: "enter the owner/repository name",
                not_found: "repository not found",
                rate_limited: "GitHub rate limit reached, try again later",
                unreachable: "could not reach GitHub",
                policy,
            },
            Locale::PtBr => Self {
                empty_input: "Digite o autor/nome do repositório",
                not_found: "Repositório não encontrado",
                rate_limited: "Limite de requisições do GitHub atingido, tente mais tarde",
                unreachable: "Não foi possível acessar o GitHub",
                policy,
            },
        }
    }

    pub fn for_failure(&self, kind: FailureKind) -> &'static str {
        match (self.policy, kind) {
            (ErrorPolicy::PerKind, FailureKind::RateLimited) => self.rate_limited,
            (ErrorPolicy::PerKind, FailureKind::Transport) => self.unreachable,
            _ => self.not_found,
        }
    }
}

impl Default for Messages {
    fn default() -> Self {
        Self::new(Locale::default(), ErrorPolicy::default())
    }
}
