use serde::Serialize;

use crate::combat_log::line::AddCombatantLine;
use crate::combat_log::watcher::PartyMember;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Combatant {
    pub actor_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_id: Option<u32>,
}

impl Combatant {
    pub fn new(actor_id: impl Into<String>) -> Self {
        Self {
            actor_id: actor_id.into(),
            display_name: None,
            job_id: None,
        }
    }

    pub fn from_add_combatant(line: &AddCombatantLine) -> Self {
        Self {
            actor_id: line.actor_id.clone(),
            display_name: Some(line.name.clone()).filter(|name| !name.is_empty()),
            job_id: Some(line.job_id).filter(|job_id| *job_id != 0),
        }
    }

    pub fn from_party_member(member: &PartyMember) -> Self {
        Self {
            actor_id: member.id.to_uppercase(),
            display_name: Some(member.name.clone()).filter(|name| !name.is_empty()),
            job_id: Some(member.job).filter(|job_id| *job_id != 0),
        }
    }

    pub fn is_fully_resolved(&self) -> bool {
        self.display_name.is_some() && self.job_id.is_some()
    }

    /// Fills in whatever is still missing. A resolved combatant is frozen.
    pub fn absorb(&mut self, other: &Combatant) {
        if self.is_fully_resolved() || other.actor_id != self.actor_id {
            return;
        }

        if self.display_name.is_none() {
            self.display_name = other.display_name.clone();
        }
        if self.job_id.is_none() {
            self.job_id = other.job_id;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Combatant;

    fn resolved(actor_id: &str, name: &str, job_id: u32) -> Combatant {
        Combatant {
            actor_id: actor_id.to_string(),
            display_name: Some(name.to_string()),
            job_id: Some(job_id),
        }
    }

    #[test]
    fn absorb_fills_missing_fields() {
        let mut combatant = Combatant::new("10FF0001");
        combatant.absorb(&Combatant {
            actor_id: "10FF0001".to_string(),
            display_name: Some("Alpha Beta".to_string()),
            job_id: None,
        });
        combatant.absorb(&resolved("10FF0001", "Other Name", 19));

        assert_eq!(combatant.display_name.as_deref(), Some("Alpha Beta"));
        assert_eq!(combatant.job_id, Some(19));
        assert!(combatant.is_fully_resolved());
    }

    #[test]
    fn resolved_combatant_ignores_updates() {
        let mut combatant = resolved("10FF0001", "Alpha Beta", 19);
        combatant.absorb(&resolved("10FF0001", "Renamed", 24));

        assert_eq!(combatant, resolved("10FF0001", "Alpha Beta", 19));
    }

    #[test]
    fn absorb_ignores_other_actors() {
        let mut combatant = Combatant::new("10FF0001");
        combatant.absorb(&resolved("10FF0002", "Someone Else", 24));

        assert_eq!(combatant.display_name, None);
    }
}
