use crate::rules::rename::validate_identifier;
use crate::rules::{Pipeline, RenameDecl, RenameIdent, RewriteRule, RuleError};
use crate::tree::DeclKind;
use serde::Deserialize;
use std::collections::HashSet;
use std::fmt;

#[derive(Debug, Deserialize, Default, Clone)]
pub struct RuleSetConfig {
    #[serde(default)]
    pub meta: Metadata,
    #[serde(default)]
    pub rules: Vec<RuleDefinition>,
}

impl RuleSetConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut issues = Vec::new();

        if self.rules.is_empty() {
            issues.push(ValidationIssue::EmptyRuleList);
        }

        let mut seen = HashSet::new();
        for rule in &self.rules {
            let rule_id = if rule.id.trim().is_empty() {
                issues.push(ValidationIssue::MissingField {
                    rule_id: None,
                    field: "id",
                });
                None
            } else {
                if !seen.insert(rule.id.as_str()) {
                    issues.push(ValidationIssue::DuplicateId {
                        rule_id: rule.id.clone(),
                    });
                }
                Some(rule.id.clone())
            };

            for (field, value) in [("from", &rule.from), ("to", &rule.to)] {
                if value.trim().is_empty() {
                    issues.push(ValidationIssue::MissingField {
                        rule_id: rule_id.clone(),
                        field,
                    });
                } else if let Err(e) = validate_identifier(value) {
                    issues.push(ValidationIssue::InvalidCombo {
                        rule_id: rule_id.clone(),
                        message: e.to_string(),
                    });
                }
            }
            if !rule.from.is_empty() && rule.from == rule.to {
                issues.push(ValidationIssue::InvalidCombo {
                    rule_id: rule_id.clone(),
                    message: format!("'from' and 'to' are both '{}'", rule.from),
                });
            }

            match (&rule.rule_type, &rule.kind) {
                (RuleType::RenameIdent, Some(_)) => {
                    issues.push(ValidationIssue::InvalidCombo {
                        rule_id: rule_id.clone(),
                        message: "'kind' only applies to rename-decl rules".to_string(),
                    });
                }
                (RuleType::RenameDecl, Some(kind)) if DeclKind::parse(kind).is_none() => {
                    issues.push(ValidationIssue::InvalidCombo {
                        rule_id: rule_id.clone(),
                        message: format!("unknown declaration kind '{kind}'"),
                    });
                }
                _ => {}
            }
        }

        if issues.is_empty() {
            Ok(())
        } else {
            Err(ValidationError { issues })
        }
    }

    /// Build the pipeline in file order.
    pub fn pipeline(&self) -> Result<Pipeline, RuleError> {
        let mut pipeline = Pipeline::new();
        for rule in &self.rules {
            pipeline.push_boxed(rule.to_rule()?);
        }
        Ok(pipeline)
    }
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct Metadata {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RuleDefinition {
    pub id: String,
    #[serde(rename = "type")]
    pub rule_type: RuleType,
    pub from: String,
    pub to: String,
    /// Declaration kind filter (`rename-decl` only).
    #[serde(default)]
    pub kind: Option<String>,
}

impl RuleDefinition {
    pub fn to_rule(&self) -> Result<Box<dyn RewriteRule>, RuleError> {
        match self.rule_type {
            RuleType::RenameIdent => Ok(Box::new(
                RenameIdent::new(&self.from, &self.to)?.named(&self.id),
            )),
            RuleType::RenameDecl => {
                let mut rule = RenameDecl::new(&self.from, &self.to)?;
                if let Some(kind) = self.kind.as_deref().and_then(DeclKind::parse) {
                    rule = rule.of_kind(kind);
                }
                Ok(Box::new(rule.named(&self.id)))
            }
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum RuleType {
    /// Rename every identifier occurrence.
    RenameIdent,
    /// Rename item-level declarations only.
    RenameDecl,
}

#[derive(Debug, Clone)]
pub struct ValidationError {
    pub issues: Vec<ValidationIssue>,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, issue) in self.issues.iter().enumerate() {
            if idx > 0 {
                writeln!(f)?;
            }
            write!(f, "{issue}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationIssue {
    EmptyRuleList,
    MissingField {
        rule_id: Option<String>,
        field: &'static str,
    },
    DuplicateId {
        rule_id: String,
    },
    InvalidCombo {
        rule_id: Option<String>,
        message: String,
    },
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationIssue::EmptyRuleList => write!(f, "rule config contains no rules"),
            ValidationIssue::MissingField { rule_id, field } => match rule_id {
                Some(id) => write!(f, "rule '{id}' missing required field '{field}'"),
                None => write!(f, "rule missing required field '{field}'"),
            },
            ValidationIssue::DuplicateId { rule_id } => {
                write!(f, "rule id '{rule_id}' is used more than once")
            }
            ValidationIssue::InvalidCombo { rule_id, message } => match rule_id {
                Some(id) => write!(f, "rule '{id}' has invalid configuration: {message}"),
                None => write!(f, "invalid rule configuration: {message}"),
            },
        }
    }
}
