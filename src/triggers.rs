//! Persuasion trigger catalogue
//!
//! The raw tokens are the values exchanged with the front end and embedded
//! (with separators replaced by spaces) in the copy generation prompt.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CopyError;

/// Persuasion-psychology category used to steer generated copy
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Trigger {
    #[default]
    #[serde(rename = "escassez")]
    Scarcity,
    #[serde(rename = "urgencia")]
    Urgency,
    #[serde(rename = "prova_social")]
    SocialProof,
    #[serde(rename = "autoridade")]
    Authority,
    #[serde(rename = "reciprocidade")]
    Reciprocity,
    #[serde(rename = "compromisso_e_coerencia")]
    CommitmentAndConsistency,
    #[serde(rename = "afinidade")]
    Affinity,
    #[serde(rename = "novidade")]
    Novelty,
    #[serde(rename = "antecipacao")]
    Anticipation,
}

impl Trigger {
    /// All triggers in catalogue order
    pub const ALL: [Trigger; 9] = [
        Trigger::Scarcity,
        Trigger::Urgency,
        Trigger::SocialProof,
        Trigger::Authority,
        Trigger::Reciprocity,
        Trigger::CommitmentAndConsistency,
        Trigger::Affinity,
        Trigger::Novelty,
        Trigger::Anticipation,
    ];

    pub fn token(&self) -> &'static str {
        match self {
            Self::Scarcity => "escassez",
            Self::Urgency => "urgencia",
            Self::SocialProof => "prova_social",
            Self::Authority => "autoridade",
            Self::Reciprocity => "reciprocidade",
            Self::CommitmentAndConsistency => "compromisso_e_coerencia",
            Self::Affinity => "afinidade",
            Self::Novelty => "novidade",
            Self::Anticipation => "antecipacao",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Scarcity => "Escassez",
            Self::Urgency => "Urgência",
            Self::SocialProof => "Prova Social",
            Self::Authority => "Autoridade",
            Self::Reciprocity => "Reciprocidade",
            Self::CommitmentAndConsistency => "Compromisso e Coerência",
            Self::Affinity => "Afinidade",
            Self::Novelty => "Novidade",
            Self::Anticipation => "Antecipação",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Scarcity => "Cria a sensação de que o produto é limitado.",
            Self::Urgency => "Incentiva a ação imediata com um prazo.",
            Self::SocialProof => "Mostra que outras pessoas estão usando e aprovando.",
            Self::Authority => "Posiciona a marca como especialista no assunto.",
            Self::Reciprocity => "Oferece algo de valor para criar um senso de dívida.",
            Self::CommitmentAndConsistency => {
                "Incentiva pequenos passos que levam a uma compra maior."
            }
            Self::Affinity => "Cria uma conexão com o cliente através de valores em comum.",
            Self::Novelty => "Desperta a curiosidade com algo novo e exclusivo.",
            Self::Anticipation => "Gera expectativa sobre um lançamento futuro.",
        }
    }

    /// Token with separators replaced by spaces, as embedded in prompts
    pub fn prompt_name(&self) -> String {
        self.token().replace('_', " ")
    }
}

impl fmt::Display for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl FromStr for Trigger {
    type Err = CopyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim();
        Self::ALL
            .into_iter()
            .find(|t| t.token() == token)
            .ok_or_else(|| CopyError::InvalidInput(format!("Unknown trigger: {}", s)))
    }
}
