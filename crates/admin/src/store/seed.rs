//! Immutable reference dataset.
//!
//! Built once at startup and shared read-only. Sessions never touch it
//! directly; they work on a [`Workspace`](super::Workspace) cloned from it,
//! which is what keeps "reset" trivially correct.

use chrono::NaiveDate;

use prifam_core::{
    AdminAccountId, AdminRole, Email, PlatformId, ReviewId, Sentiment, UploadStatus, UserId,
    UserStatus,
};

use super::StoreError;
use crate::models::{
    AdminAccount, ChartPoint, DashboardSnapshot, Platform, Review, StatCard, UploadRecord, User,
};

/// The read-only seed data every workspace starts from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceData {
    pub reviews: Vec<Review>,
    pub platforms: Vec<Platform>,
    pub users: Vec<User>,
    pub admin_accounts: Vec<AdminAccount>,
    pub upload_history: Vec<UploadRecord>,
    pub admin_dashboard: DashboardSnapshot,
    pub super_admin_dashboard: DashboardSnapshot,
}

impl ReferenceData {
    /// Build the built-in seed dataset.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidSeed`] if a seed email fails validation.
    pub fn seeded() -> Result<Self, StoreError> {
        let reviews = seed_reviews();
        let admin_dashboard = DashboardSnapshot {
            stats: vec![
                StatCard::up("Total Reviews", "455", "+12.5%"),
                StatCard::up("Average Rating", "4.2", "+0.3"),
                StatCard::up("Response Rate", "89%", "+5%"),
                StatCard::up("Sentiment Score", "73%", "+8%"),
            ],
            monthly_reviews: months(&[45, 52, 38, 67, 71, 83]),
            sentiment: sentiment_split(245, 123, 87),
            platforms: platform_split(156, 143, 89, 67),
            recent_reviews: reviews.iter().take(3).cloned().collect(),
        };
        let super_admin_dashboard = DashboardSnapshot {
            stats: vec![
                StatCard::up("Total Admins", "23", "+2"),
                StatCard::up("Total Reviews", "8,455", "+15.5%"),
                StatCard::up("Active Systems", "12", "100%"),
                StatCard::up("System Health", "99.9%", "+0.1%"),
            ],
            monthly_reviews: months(&[1245, 1352, 1138, 1467, 1571, 1683]),
            sentiment: sentiment_split(2145, 1023, 687),
            platforms: platform_split(1256, 1143, 789, 567),
            recent_reviews: Vec::new(),
        };

        Ok(Self {
            reviews,
            platforms: seed_platforms(),
            users: seed_users()?,
            admin_accounts: seed_admin_accounts()?,
            upload_history: seed_upload_history(),
            admin_dashboard,
            super_admin_dashboard,
        })
    }

    /// Look up a review by ID.
    #[must_use]
    pub fn review(&self, id: ReviewId) -> Option<&Review> {
        self.reviews.iter().find(|r| r.id == id)
    }

    /// Distinct review platforms in first-seen order.
    #[must_use]
    pub fn review_platforms(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for review in &self.reviews {
            if !seen.contains(&review.platform.as_str()) {
                seen.push(&review.platform);
            }
        }
        seen
    }
}

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}

fn months(values: &[u64]) -> Vec<ChartPoint> {
    ["Jan", "Feb", "Mar", "Apr", "May", "Jun"]
        .iter()
        .zip(values)
        .map(|(month, value)| ChartPoint::new(month, *value))
        .collect()
}

fn sentiment_split(positive: u64, neutral: u64, negative: u64) -> Vec<ChartPoint> {
    vec![
        ChartPoint::new(Sentiment::Positive.title(), positive),
        ChartPoint::new(Sentiment::Neutral.title(), neutral),
        ChartPoint::new(Sentiment::Negative.title(), negative),
    ]
}

fn platform_split(zomato: u64, swiggy: u64, blinkit: u64, others: u64) -> Vec<ChartPoint> {
    vec![
        ChartPoint::new("Zomato", zomato),
        ChartPoint::new("Swiggy", swiggy),
        ChartPoint::new("BlinkIT", blinkit),
        ChartPoint::new("Others", others),
    ]
}

#[allow(clippy::too_many_lines)]
fn seed_reviews() -> Vec<Review> {
    vec![
        Review {
            id: ReviewId::new(1),
            text: "Amazing food quality and super fast delivery! The paneer butter masala was absolutely delicious. Will definitely order again. The packaging was also excellent and the food was still hot when it arrived.".to_string(),
            platform: "Zomato".to_string(),
            rating: 5,
            sentiment: Sentiment::Positive,
            suggested_response: "Thank you so much for your wonderful feedback! We're thrilled to hear that you enjoyed our paneer butter masala and that the delivery met your expectations. We look forward to serving you again soon!".to_string(),
            date: date(2024, 1, 20),
            customer: "Rahul Sharma".to_string(),
        },
        Review {
            id: ReviewId::new(2),
            text: "Food was okay but delivery took too long. I ordered at 7 PM and received it at 9:30 PM. The biryani was cold and the raita was missing from my order.".to_string(),
            platform: "Swiggy".to_string(),
            rating: 2,
            sentiment: Sentiment::Negative,
            suggested_response: "We sincerely apologize for the delayed delivery and the missing item in your order. This is not the standard we aim for. We're taking immediate action to improve our delivery times and order accuracy. Please reach out to us directly so we can make this right.".to_string(),
            date: date(2024, 1, 19),
            customer: "Priya Mehta".to_string(),
        },
        Review {
            id: ReviewId::new(3),
            text: "Good variety of dishes available. Tried their South Indian combo and it was decent. Service is average but food quality is consistent.".to_string(),
            platform: "Zomato".to_string(),
            rating: 4,
            sentiment: Sentiment::Neutral,
            suggested_response: "Thank you for trying our South Indian combo! We appreciate your feedback about our variety and consistency. We're always working to improve our service and would love to exceed your expectations on your next visit.".to_string(),
            date: date(2024, 1, 18),
            customer: "Amit Kumar".to_string(),
        },
        Review {
            id: ReviewId::new(4),
            text: "Terrible experience! The food was completely stale and inedible. When I called to complain, the customer service was rude and unhelpful. Will never order again.".to_string(),
            platform: "BlinkIT".to_string(),
            rating: 1,
            sentiment: Sentiment::Negative,
            suggested_response: "We are extremely sorry to hear about your poor experience. This is absolutely unacceptable and we take full responsibility. We would like to refund your order and ensure this never happens again. Please contact our management team directly.".to_string(),
            date: date(2024, 1, 17),
            customer: "Sneha Patel".to_string(),
        },
        Review {
            id: ReviewId::new(5),
            text: "Excellent service and delicious food! The chicken tikka was perfectly cooked and the naan was fresh. Delivery was prompt and the delivery person was courteous.".to_string(),
            platform: "Swiggy".to_string(),
            rating: 5,
            sentiment: Sentiment::Positive,
            suggested_response: "We're delighted to hear about your excellent experience! Our team takes great pride in preparing fresh, quality food and providing prompt, courteous service. Thank you for choosing us and we look forward to serving you again!".to_string(),
            date: date(2024, 1, 16),
            customer: "Vikash Singh".to_string(),
        },
    ]
}

fn platform(
    id: &str,
    name: &str,
    description: &str,
    is_active: bool,
    category: &str,
    icon: &str,
) -> Platform {
    Platform {
        id: PlatformId::from(id),
        name: name.to_string(),
        description: description.to_string(),
        is_active,
        category: category.to_string(),
        icon: icon.to_string(),
    }
}

fn seed_platforms() -> Vec<Platform> {
    vec![
        platform("zomato", "Zomato", "Food delivery and restaurant discovery platform", true, "Food Delivery", "🍕"),
        platform("swiggy", "Swiggy", "Online food ordering and delivery platform", true, "Food Delivery", "🛵"),
        platform("blinkit", "BlinkIT", "Instant grocery delivery service", true, "Grocery", "🛒"),
        platform("uber-eats", "Uber Eats", "Food delivery service by Uber", false, "Food Delivery", "🚗"),
        platform("bigbasket", "BigBasket", "Online grocery shopping platform", false, "Grocery", "🥬"),
        platform("dunzo", "Dunzo", "Hyperlocal delivery platform", false, "Delivery", "📦"),
        platform("grofers", "Grofers", "Online grocery delivery service", false, "Grocery", "🛍️"),
        platform("amazon-fresh", "Amazon Fresh", "Amazon's grocery delivery service", false, "Grocery", "📦"),
    ]
}

fn seed_users() -> Result<Vec<User>, StoreError> {
    let rows = [
        (1, "John Smith", "john.smith@company.com", AdminRole::Admin, UserStatus::Active, (1, 15), (1, 20)),
        (2, "Sarah Johnson", "sarah.johnson@company.com", AdminRole::Agent, UserStatus::Active, (1, 10), (1, 19)),
        (3, "Mike Wilson", "mike.wilson@company.com", AdminRole::Viewer, UserStatus::Inactive, (1, 5), (1, 12)),
        (4, "Emily Davis", "emily.davis@company.com", AdminRole::SuperAdmin, UserStatus::Active, (1, 1), (1, 20)),
        (5, "Alex Chen", "alex.chen@company.com", AdminRole::Admin, UserStatus::Active, (1, 8), (1, 18)),
    ];

    rows.into_iter()
        .map(|(id, name, email, role, status, created, last)| {
            Ok(User {
                id: UserId::new(id),
                name: name.to_string(),
                email: Email::parse(email)?,
                role,
                status,
                created_date: date(2024, created.0, created.1),
                last_login: Some(date(2024, last.0, last.1)),
            })
        })
        .collect()
}

fn seed_admin_accounts() -> Result<Vec<AdminAccount>, StoreError> {
    let rows = [
        (1, "John Smith", "john.smith@company.com", UserStatus::Active, (1, 15), (1, 20)),
        (2, "Sarah Johnson", "sarah.johnson@company.com", UserStatus::Active, (1, 10), (1, 19)),
        (3, "Mike Wilson", "mike.wilson@company.com", UserStatus::Inactive, (1, 5), (1, 12)),
    ];

    rows.into_iter()
        .map(|(id, name, email, status, created, last)| {
            Ok(AdminAccount {
                id: AdminAccountId::new(id),
                name: name.to_string(),
                email: Email::parse(email)?,
                status,
                created_date: date(2024, created.0, created.1),
                last_login: date(2024, last.0, last.1),
            })
        })
        .collect()
}

fn seed_upload_history() -> Vec<UploadRecord> {
    vec![
        UploadRecord {
            file: "reviews_jan_2024.csv".to_string(),
            date: date(2024, 1, 20),
            review_count: Some(125),
            status: UploadStatus::Completed,
        },
        UploadRecord {
            file: "swiggy_reviews.xlsx".to_string(),
            date: date(2024, 1, 19),
            review_count: Some(89),
            status: UploadStatus::Completed,
        },
        UploadRecord {
            file: "zomato_batch_1.csv".to_string(),
            date: date(2024, 1, 18),
            review_count: Some(156),
            status: UploadStatus::Processing,
        },
    ]
}
