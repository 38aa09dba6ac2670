use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::models::catalog::{CourseRow, DifficultyLevel, EventRow};
use crate::models::posting::ContentCategory;

fn course(
    id: u128,
    slug: &str,
    title: &str,
    description: &str,
    category: ContentCategory,
    difficulty: DifficultyLevel,
    duration_hours: i32,
) -> CourseRow {
    CourseRow {
        id: Uuid::from_u128(id),
        slug: slug.to_string(),
        title: title.to_string(),
        description: Some(description.to_string()),
        category: Some(category),
        difficulty,
        duration_hours: Some(duration_hours),
        created_at: DateTime::<Utc>::default(),
    }
}

fn event(id: u128, slug: &str, title: &str, description: &str, location: &str) -> EventRow {
    EventRow {
        id: Uuid::from_u128(id),
        slug: slug.to_string(),
        title: title.to_string(),
        description: Some(description.to_string()),
        location: Some(location.to_string()),
        starts_at: None,
        created_at: DateTime::<Utc>::default(),
    }
}

pub fn courses() -> Vec<CourseRow> {
    vec![
        course(
            0x5eed_0001,
            "web-development-fundamentals",
            "Web Development Fundamentals",
            "HTML, CSS and JavaScript from first page to deployed site.",
            ContentCategory::Technology,
            DifficultyLevel::Beginner,
            24,
        ),
        course(
            0x5eed_0002,
            "data-analysis-with-python",
            "Data Analysis with Python",
            "pandas, plotting and the statistics behind everyday analysis.",
            ContentCategory::DataScience,
            DifficultyLevel::Intermediate,
            30,
        ),
        course(
            0x5eed_0003,
            "product-design-essentials",
            "Product Design Essentials",
            "User research, wireframing and usability testing.",
            ContentCategory::Design,
            DifficultyLevel::Beginner,
            16,
        ),
        course(
            0x5eed_0004,
            "digital-marketing-strategy",
            "Digital Marketing Strategy",
            "Channels, funnels and measuring campaign performance.",
            ContentCategory::Marketing,
            DifficultyLevel::Intermediate,
            12,
        ),
        course(
            0x5eed_0005,
            "cloud-architecture",
            "Cloud Architecture",
            "Designing reliable services on managed infrastructure.",
            ContentCategory::Technology,
            DifficultyLevel::Advanced,
            40,
        ),
    ]
}

pub fn events() -> Vec<EventRow> {
    vec![
        event(
            0x5eed_1001,
            "career-fair-online",
            "Online Career Fair",
            "Meet hiring teams and book short intro calls.",
            "Online",
        ),
        event(
            0x5eed_1002,
            "resume-review-clinic",
            "Resume Review Clinic",
            "Live feedback on resumes from recruiters.",
            "Online",
        ),
        event(
            0x5eed_1003,
            "hackathon-weekend",
            "Hackathon Weekend",
            "48 hours to build and demo a project with a team.",
            "Bengaluru",
        ),
    ]
}
