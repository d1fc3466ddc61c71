use chrono::{Duration, SecondsFormat, Utc};
use serde_json::{json, Value};

pub const ENGINEERING_ID: &str = "65a1b2c3d4e5f60718293a4b";

fn hours_ago(hours: i64) -> String {
    (Utc::now() - Duration::hours(hours)).to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn days_ago(days: i64) -> String {
    (Utc::now() - Duration::days(days)).to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Seed documents. Job creation times are relative to now so posting-date
/// windows resolve predictably.
pub fn seed() -> Value {
    json!({
        "jobs": [
            {
                "postName": "Senior Rust Engineer",
                "description": "Build the matching engine",
                "location": "Dhaka",
                "workMode": "Remote",
                "jobType": "Full-Time",
                "salaryRange": "80-120 yearly",
                "experienceInRange": "4+ years",
                "vendorInfo": { "vendorName": "Acme Labs", "companyType": "Startup", "city": "Dhaka" },
                "categoryInfo": { "categoryName": "Engineering" },
                "categories": { "$oid": ENGINEERING_ID },
                "createdAt": hours_ago(1)
            },
            {
                "postName": "Product Designer",
                "description": "Own the design system",
                "location": "Chattogram",
                "workMode": "Hybrid",
                "jobType": "Part-Time",
                "salaryRange": "40-60 monthly",
                "experience": "2-4 years",
                "vendorInfo": { "vendorName": "Pixel Co", "companyType": "Agency", "city": "Chattogram" },
                "categoryInfo": { "categoryName": "Design" },
                "createdAt": days_ago(3)
            },
            {
                "postName": "Graduate Support Engineer",
                "description": "Help customers with rust tooling",
                "location": "Khulna",
                "workMode": "Onsite",
                "jobType": "Internship",
                "salaryRange": "10-20 yearly",
                "experienceInRange": "Fresher",
                "vendorInfo": { "vendorName": "Helpdesk Inc", "companyType": "MNC", "city": "Khulna" },
                "categoryInfo": { "categoryName": "Support" },
                "createdAt": days_ago(10)
            }
        ],
        "users": [
            { "email": "ada@example.org", "phone": "01700000001", "userStatus": "active", "paymentMethod": "card", "createdAt": days_ago(1) },
            { "email": "bob@example.org", "phone": "01700000002", "userStatus": "blocked", "paymentMethod": "bkash", "createdAt": days_ago(2) }
        ],
        "categories": [
            { "categoryName": "Engineering", "slug": "engineering", "isActive": true, "createdAt": days_ago(30) },
            { "categoryName": "Design", "slug": "design", "isActive": true, "createdAt": days_ago(20) },
            { "categoryName": "Support", "slug": "support", "isActive": false, "createdAt": days_ago(10) }
        ]
    })
}
