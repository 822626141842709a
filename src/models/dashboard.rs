//! Aggregate statistics shown on the portal dashboard.

use serde::Serialize;

use super::Intern;

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_donations: i64,
    pub total_interns: usize,
    pub avg_donations: i64,
    pub top_performer: Option<Intern>,
}

impl DashboardStats {
    /// Compute stats over a roster. The average rounds half up; an empty
    /// roster yields zero and no top performer. Ties go to the earlier intern.
    pub fn from_interns(interns: &[Intern]) -> Self {
        let total_donations = total_donations(interns);
        let total_interns = interns.len();
        let avg_donations = if total_interns == 0 {
            0
        } else {
            (total_donations as f64 / total_interns as f64).round() as i64
        };

        let top_performer = interns
            .iter()
            .fold(None::<&Intern>, |best, intern| match best {
                Some(b) if b.donations_raised >= intern.donations_raised => Some(b),
                _ => Some(intern),
            })
            .cloned();

        Self {
            total_donations,
            total_interns,
            avg_donations,
            top_performer,
        }
    }
}

/// Sum of all donations, saturating at `i64::MAX`.
pub fn total_donations(interns: &[Intern]) -> i64 {
    interns
        .iter()
        .fold(0i64, |total, i| total.saturating_add(i.donations_raised))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::default_interns;

    #[test]
    fn test_default_roster_dashboard() {
        let stats = DashboardStats::from_interns(&default_interns());
        assert_eq!(stats.total_donations, 51500);
        assert_eq!(stats.total_interns, 5);
        assert_eq!(stats.avg_donations, 10300);
        assert_eq!(stats.top_performer.unwrap().name, "Siya Shrivastava");
    }

    #[test]
    fn test_empty_roster() {
        let stats = DashboardStats::from_interns(&[]);
        assert_eq!(stats.total_donations, 0);
        assert_eq!(stats.avg_donations, 0);
        assert!(stats.top_performer.is_none());
    }

    #[test]
    fn test_tie_keeps_first_and_average_rounds_half_up() {
        let mut interns = default_interns();
        interns.truncate(2);
        interns[0].donations_raised = 5;
        interns[1].donations_raised = 6;
        let stats = DashboardStats::from_interns(&interns);
        assert_eq!(stats.avg_donations, 6);

        interns[1].donations_raised = 5;
        let stats = DashboardStats::from_interns(&interns);
        assert_eq!(stats.top_performer.unwrap().id, 1);
    }

    #[test]
    fn test_total_saturates_instead_of_overflowing() {
        let mut interns = default_interns();
        interns[0].donations_raised = i64::MAX - 1000;
        let stats = DashboardStats::from_interns(&interns);
        assert_eq!(stats.total_donations, i64::MAX);
        assert_eq!(stats.top_performer.unwrap().id, 1);
        assert!(stats.avg_donations > 0);
    }
}
