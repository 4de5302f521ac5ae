//! Display panels for the department portals. Hardcoded demo data.
//!
//! Nothing here is computed; the only live input is the incident priority shown
//! on the Operations portal. Panels exist only while an incident is active.

use crate::incident::IncidentState;
use crate::roles::Role;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricTile {
    pub label: String,
    pub value: String,
    pub subtext: Option<String>,
    pub color: String,
}

impl MetricTile {
    fn new(label: &str, value: impl Into<String>, color: &str) -> Self {
        Self {
            label: label.to_string(),
            value: value.into(),
            subtext: None,
            color: color.to_string(),
        }
    }

    fn subtext(mut self, text: &str) -> Self {
        self.subtext = Some(text.to_string());
        self
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertLevel {
    Critical,
    Warning,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertLine {
    pub level: AlertLevel,
    pub text: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Approval {
    pub title: String,
    pub amount: String,
    pub urgency: String,
    pub requested_by: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerRow {
    pub initials: String,
    pub name: String,
    pub sla: String,
    pub status: String,
    pub level: AlertLevel,
}

/// One block of a portal page, in display order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum PanelSection {
    Tiles {
        title: String,
        tiles: Vec<MetricTile>,
    },
    Alerts {
        title: String,
        summary: String,
        items: Vec<AlertLine>,
    },
    /// Horizontal bar filled to `percent`, with captions at both ends.
    Progress {
        title: String,
        left: String,
        right: String,
        percent: u8,
        markers: Vec<String>,
        footnote: Option<String>,
    },
    Approvals {
        title: String,
        items: Vec<Approval>,
    },
    Customers {
        title: String,
        items: Vec<CustomerRow>,
    },
}

impl PanelSection {
    pub fn title(&self) -> &str {
        match self {
            PanelSection::Tiles { title, .. }
            | PanelSection::Alerts { title, .. }
            | PanelSection::Progress { title, .. }
            | PanelSection::Approvals { title, .. }
            | PanelSection::Customers { title, .. } => title,
        }
    }
}

fn alert(level: AlertLevel, text: &str) -> AlertLine {
    AlertLine {
        level,
        text: text.to_string(),
    }
}

fn customer(initials: &str, name: &str, sla: &str, level: AlertLevel) -> CustomerRow {
    CustomerRow {
        initials: initials.to_string(),
        name: name.to_string(),
        sla: sla.to_string(),
        status: "At Risk".to_string(),
        level,
    }
}

fn tiles(title: &str, tiles: Vec<MetricTile>) -> PanelSection {
    PanelSection::Tiles {
        title: title.to_string(),
        tiles,
    }
}

/// Panels of `role`'s portal. Empty while no incident is active.
pub fn portal_sections(role: Role, incident: &IncidentState) -> Vec<PanelSection> {
    if !incident.is_active {
        return Vec::new();
    }
    match role {
        Role::It => vec![
            tiles(
                "System Health",
                vec![
                    MetricTile::new("PostgreSQL Primary", "DEGRADED", "#EA580C")
                        .subtext("95/100 connections | 3000ms latency"),
                    MetricTile::new("Redis Cache", "DOWN", "#DC2626")
                        .subtext("Last heartbeat: 2m ago"),
                    MetricTile::new("API Gateway", "SLOW", "#D97706")
                        .subtext("P95: 3000ms (threshold: 500ms)"),
                ],
            ),
            PanelSection::Alerts {
                title: "Recent Activity".to_string(),
                summary: "3 alerts".to_string(),
                items: vec![
                    alert(AlertLevel::Critical, "14:23 PostgreSQL connection pool full"),
                    alert(AlertLevel::Critical, "14:24 Redis timeout after 5000ms"),
                    alert(AlertLevel::Warning, "14:25 API latency spike detected"),
                ],
            },
        ],
        Role::Ops => vec![
            tiles(
                "Business Impact Overview",
                vec![
                    MetricTile::new("Affected Customers", "500", "#6D28D9"),
                    MetricTile::new("SLA Violations", "12", "#DC2626"),
                    MetricTile::new("Current Priority", incident.priority.to_string(), "#EA580C"),
                ],
            ),
            PanelSection::Progress {
                title: "Incident Timeline".to_string(),
                left: "14:23".to_string(),
                right: "Now".to_string(),
                percent: 65,
                markers: vec![
                    "Detected".to_string(),
                    format!("Set {}", incident.priority),
                    "Investigating".to_string(),
                ],
                footnote: None,
            },
        ],
        Role::Finance => vec![
            tiles(
                "Incident Cost Analysis",
                vec![
                    MetricTile::new("Current Costs", "$25,000", "#047857"),
                    MetricTile::new("SLA Penalty Exposure", "$50,000", "#DC2626"),
                    MetricTile::new("Total at Risk", "$75,000", "#047857"),
                ],
            ),
            PanelSection::Progress {
                title: "Budget Impact".to_string(),
                left: "Incident Budget (YTD)".to_string(),
                right: "78% used".to_string(),
                percent: 78,
                markers: Vec::new(),
                footnote: Some("Remaining: $220K of $1M annual".to_string()),
            },
            PanelSection::Approvals {
                title: "Pending Approvals".to_string(),
                items: vec![Approval {
                    title: "Emergency Cloud Scaling".to_string(),
                    amount: "$10,000".to_string(),
                    urgency: "⚡ Urgent".to_string(),
                    requested_by: "Requested by: IT Operations".to_string(),
                }],
            },
        ],
        Role::Csm => vec![
            tiles(
                "Customer Impact Assessment",
                vec![
                    MetricTile::new("Enterprise", "50", "#C2410C").subtext("High Impact"),
                    MetricTile::new("SMB", "200", "#EA580C").subtext("Medium Impact"),
                    MetricTile::new("Free", "250", "#2563EB").subtext("Low Impact"),
                ],
            ),
            PanelSection::Customers {
                title: "Top Affected Customers".to_string(),
                items: vec![
                    customer("AC", "Acme Corp", "99.9% SLA", AlertLevel::Critical),
                    customer("TS", "TechStart Inc", "99.5% SLA", AlertLevel::Warning),
                ],
            },
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::incident::{IncidentStore, IncidentTemplate, Priority};

    fn titles(sections: &[PanelSection]) -> Vec<&str> {
        sections.iter().map(PanelSection::title).collect()
    }

    #[test]
    fn panels_hidden_without_an_active_incident() {
        for role in Role::ALL {
            assert!(portal_sections(role, &IncidentState::default()).is_empty());
        }
    }

    #[test]
    fn each_portal_shows_its_panels_once_triggered() {
        let active = IncidentStore::new().trigger();
        assert_eq!(
            titles(&portal_sections(Role::It, &active)),
            ["System Health", "Recent Activity"]
        );
        assert_eq!(
            titles(&portal_sections(Role::Ops, &active)),
            ["Business Impact Overview", "Incident Timeline"]
        );
        assert_eq!(
            titles(&portal_sections(Role::Finance, &active)),
            ["Incident Cost Analysis", "Budget Impact", "Pending Approvals"]
        );
        assert_eq!(
            titles(&portal_sections(Role::Csm, &active)),
            ["Customer Impact Assessment", "Top Affected Customers"]
        );
    }

    #[test]
    fn tile_colors_are_per_tile() {
        let active = IncidentStore::new().trigger();
        let colors = |role| match &portal_sections(role, &active)[0] {
            PanelSection::Tiles { tiles, .. } => {
                tiles.iter().map(|t| t.color.clone()).collect::<Vec<_>>()
            }
            other => panic!("expected tiles first, got {other:?}"),
        };
        assert_eq!(colors(Role::It), ["#EA580C", "#DC2626", "#D97706"]);
        assert_eq!(colors(Role::Finance), ["#047857", "#DC2626", "#047857"]);
        assert_eq!(colors(Role::Csm), ["#C2410C", "#EA580C", "#2563EB"]);
    }

    #[test]
    fn finance_budget_and_approvals() {
        let active = IncidentStore::new().trigger();
        let sections = portal_sections(Role::Finance, &active);
        match &sections[1] {
            PanelSection::Progress {
                percent, footnote, ..
            } => {
                assert_eq!(*percent, 78);
                assert_eq!(footnote.as_deref(), Some("Remaining: $220K of $1M annual"));
            }
            other => panic!("expected budget bar, got {other:?}"),
        }
        match &sections[2] {
            PanelSection::Approvals { items, .. } => {
                assert_eq!(items.len(), 1);
                assert_eq!(items[0].amount, "$10,000");
            }
            other => panic!("expected approvals, got {other:?}"),
        }
    }

    #[test]
    fn operations_priority_tracks_incident() {
        let store = IncidentStore::with_template(IncidentTemplate {
            priority: Priority::P1,
            ..IncidentTemplate::default()
        });
        let sections = portal_sections(Role::Ops, &store.trigger());
        match &sections[0] {
            PanelSection::Tiles { tiles, .. } => assert_eq!(tiles[2].value, "P1"),
            other => panic!("expected tiles, got {other:?}"),
        }
        match &sections[1] {
            PanelSection::Progress { markers, .. } => assert_eq!(markers[1], "Set P1"),
            other => panic!("expected timeline, got {other:?}"),
        }
        assert!(portal_sections(Role::Ops, &store.reset()).is_empty());
    }
}
