//! Intern model matching the portal's stored intern records.

use serde::{Deserialize, Serialize};

/// A single intern on the roster.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Intern {
    pub id: i64,
    pub name: String,
    pub referral_code: String,
    /// Cumulative donations; stored documents without the field count as zero.
    #[serde(default)]
    pub donations_raised: i64,
    pub email: String,
    pub department: String,
    pub join_date: String,
    pub avatar: String,
    /// Set by the donation increment, RFC 3339.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<String>,
}

/// Request body for `PUT /api/interns/{id}/donations`.
///
/// `amount` is kept loose so that numeric strings are accepted as well.
#[derive(Debug, Clone, Deserialize)]
pub struct DonationRequest {
    #[serde(default)]
    pub amount: Option<serde_json::Value>,
}

impl DonationRequest {
    /// Parse the amount into a whole number, truncating fractional values.
    /// Values outside the `i64` range are rejected.
    pub fn parse_amount(&self) -> Option<i64> {
        match self.amount.as_ref()? {
            serde_json::Value::Number(n) => n.as_i64().or_else(|| {
                n.as_f64()
                    .filter(|f| f.is_finite() && f.abs() < i64::MAX as f64)
                    .map(|f| f.trunc() as i64)
            }),
            serde_json::Value::String(s) => s.trim().parse::<i64>().ok(),
            _ => None,
        }
    }
}

/// The roster the local store hands out before anything has been saved.
pub fn default_interns() -> Vec<Intern> {
    let seed = [
        (1, "Siya Shrivastava", "siya2025", 18000, "siya@example.com", "Frontend Development", "2024-01-15", "👩‍💻"),
        (2, "Madhu Kumari", "madhu2025", 12000, "madhu@example.com", "Backend Development", "2024-01-20", "👩‍💼"),
        (3, "Priti Kumari", "priti2025", 9500, "priti@example.com", "UI/UX Design", "2024-02-01", "🎨"),
        (4, "Aishvariya Shrivastava", "aishvariya2025", 7000, "aishvariya@example.com", "Data Science", "2024-02-10", "📊"),
        (5, "Shakshi Patel", "shakshi2025", 5000, "shakshi@example.com", "Mobile Development", "2024-02-15", "📱"),
    ];

    seed.into_iter()
        .map(
            |(id, name, referral_code, donations_raised, email, department, join_date, avatar)| Intern {
                id,
                name: name.to_string(),
                referral_code: referral_code.to_string(),
                donations_raised,
                email: email.to_string(),
                department: department.to_string(),
                join_date: join_date.to_string(),
                avatar: avatar.to_string(),
                last_updated: None,
            },
        )
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_default_roster() {
        let interns = default_interns();
        assert_eq!(interns.len(), 5);
        assert_eq!(interns[0].name, "Siya Shrivastava");
        assert_eq!(interns[0].donations_raised, 18000);
        assert_eq!(interns.iter().map(|i| i.donations_raised).sum::<i64>(), 51500);
    }

    #[test]
    fn test_camel_case_wire_format() {
        let value = serde_json::to_value(&default_interns()[1]).unwrap();
        assert_eq!(value["referralCode"], "madhu2025");
        assert_eq!(value["donationsRaised"], 12000);
        assert_eq!(value["joinDate"], "2024-01-20");
        assert!(value.get("lastUpdated").is_none());
    }

    #[test]
    fn test_missing_donations_default_to_zero() {
        let intern: Intern = serde_json::from_value(json!({
            "id": 9,
            "name": "New",
            "referralCode": "new2025",
            "email": "new@example.com",
            "department": "QA",
            "joinDate": "2024-03-01",
            "avatar": "🧪"
        }))
        .unwrap();
        assert_eq!(intern.donations_raised, 0);
    }

    #[test]
    fn test_parse_amount() {
        let parse = |v: serde_json::Value| DonationRequest { amount: Some(v) }.parse_amount();
        assert_eq!(parse(json!(250)), Some(250));
        assert_eq!(parse(json!("300")), Some(300));
        assert_eq!(parse(json!(12.9)), Some(12));
        assert_eq!(parse(json!(0.5)), Some(0));
        assert_eq!(parse(json!(1e300)), None);
        assert_eq!(parse(json!(-1e300)), None);
        assert_eq!(parse(json!(u64::MAX)), None);
        assert_eq!(parse(json!("9223372036854775808")), None);
        assert_eq!(parse(json!("abc")), None);
        assert_eq!(parse(json!(null)), None);
        assert_eq!(DonationRequest { amount: None }.parse_amount(), None);
    }
}
