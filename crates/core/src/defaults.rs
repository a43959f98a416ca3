//! Sample content written on first start, so a fresh album is not empty.

use crate::domain::{Comment, HeroContent, Photo, PhotoSize, TimelineEvent};

fn unsplash(photo: &str, width: u32) -> String {
    format!("https://images.unsplash.com/{photo}?q=80&w={width}&auto=format&fit=crop")
}

fn sample(id: i64, photo: &str, title: &str, size: PhotoSize, likes: u32) -> Photo {
    Photo {
        id,
        url: unsplash(photo, 1000),
        title: title.to_string(),
        size,
        date: None,
        likes,
        comments: Vec::new(),
    }
}

fn comment(id: i64, text: &str, date: &str) -> Comment {
    Comment {
        id,
        text: text.to_string(),
        date: date.to_string(),
    }
}

pub fn photos() -> Vec<Photo> {
    let mut first_birthday = sample(
        1,
        "photo-1596727147705-001d009268f7",
        "첫 번째 생일 (First Birthday)",
        PhotoSize::Large,
        12,
    );
    first_birthday.comments = vec![
        comment(101, "너무 귀엽다! 축하해~", "2024-03-15T10:00:00Z"),
        comment(102, "돌잡이 뭐 잡았어?", "2024-03-15T10:05:00Z"),
    ];

    let mut walking = sample(
        3,
        "photo-1582213782179-e0d53f98f2ca",
        "함께 걷는 길 (Walking Together)",
        PhotoSize::Tall,
        15,
    );
    walking.comments = vec![comment(103, "보기 좋은 뒷모습 ^^", "2024-04-20T14:30:00Z")];

    vec![
        first_birthday,
        sample(2, "photo-1544211181-43202157579c", "가족 여행 (Family Trip)", PhotoSize::Medium, 8),
        walking,
        sample(4, "photo-1510526027014-da9826388e40", "행복한 저녁 (Happy Dinner)", PhotoSize::Wide, 5),
        sample(5, "photo-1581404917879-53e19259fdda", "우리 아이 (My Little One)", PhotoSize::Medium, 24),
        sample(6, "photo-1610216705422-caa3fcb6d158", "봄나들이 (Spring Picnic)", PhotoSize::Tall, 7),
        sample(7, "photo-1512130325492-9c12b8474d2b", "소중한 순간 (Precious Moment)", PhotoSize::Wide, 19),
        sample(8, "photo-1476703993279-415558bc6892", "자연 속에서 (In Nature)", PhotoSize::Medium, 3),
    ]
}

pub fn hero() -> HeroContent {
    HeroContent {
        title: "Cherished Moments".to_string(),
        subtitle: "평범한 하루가 가장 아름다운 이야기입니다.\n우리의 소중한 추억을 영원히 간직하세요."
            .to_string(),
        image: unsplash("photo-1511895426328-dc8714191300", 2070),
    }
}

fn event(id: i64, date: &str, title: &str, desc: &str, photo: &str) -> TimelineEvent {
    TimelineEvent {
        id,
        date: date.to_string(),
        title: title.to_string(),
        desc: desc.to_string(),
        img: Some(unsplash(photo, 800)),
    }
}

/// Already in descending date order.
pub fn timeline() -> Vec<TimelineEvent> {
    vec![
        event(
            1,
            "2025-12-25",
            "Christmas Dinner",
            "A wonderful evening with everyone gathered around the table.",
            "photo-1576824228987-a3d8df8d4360",
        ),
        event(
            2,
            "2025-11-15",
            "Autumn Hike",
            "The mountains were golden. Dad made it to the peak!",
            "photo-1445778235210-9b4344d5a92a",
        ),
        event(
            3,
            "2025-09-02",
            "Back to School",
            "First day for the little ones. They were so excited.",
            "photo-1427504746696-ea5abd7dfe33",
        ),
        event(
            4,
            "2025-07-20",
            "Summer Vacation",
            "Jeju Island trip. The sunset was unforgettable.",
            "photo-1507525428034-b723cf961d3e",
        ),
    ]
}
