//! Sample library used to seed a fresh vault

use crate::core::data::{Collection, Prompt, VaultState};
use chrono::{DateTime, Utc};

fn ts(value: &str) -> DateTime<Utc> {
    value.parse().unwrap_or_default()
}

fn collection(id: &str, user_id: &str, name: &str, description: &str, color: &str, at: &str) -> Collection {
    Collection {
        id: id.to_string(),
        user_id: user_id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        color: color.to_string(),
        created_at: ts(at),
        updated_at: ts(at),
    }
}

struct Sample {
    id: &'static str,
    collection_id: Option<&'static str>,
    title: &'static str,
    content: &'static str,
    output: &'static str,
    tags: &'static [&'static str],
    is_favorite: bool,
    is_template: bool,
    created_at: &'static str,
    updated_at: &'static str,
}

const SAMPLES: &[Sample] = &[
    Sample {
        id: "prompt-1",
        collection_id: Some("col-1"),
        title: "Product Launch Email",
        content: "Write a compelling product launch email for [PRODUCT NAME] that highlights the key benefits and creates urgency. Include:\n\n- Attention-grabbing subject line\n- Personal greeting\n- Problem/solution narrative\n- Key features and benefits\n- Social proof or testimonials\n- Clear call-to-action\n- Limited-time offer\n\nTone: Professional yet conversational\nTarget audience: [DESCRIBE AUDIENCE]",
        output: "Subject: Finally Here: [PRODUCT NAME] is Live (Limited Time Bonus Inside)\n\nHi [NAME],\n\nAfter months of development and testing, I'm thrilled to announce that [PRODUCT NAME] is officially available!",
        tags: &["marketing", "email", "product-launch", "copywriting"],
        is_favorite: true,
        is_template: true,
        created_at: "2024-01-20T16:45:00Z",
        updated_at: "2024-01-22T11:30:00Z",
    },
    Sample {
        id: "prompt-2",
        collection_id: Some("col-2"),
        title: "Character Development Worksheet",
        content: "Create a detailed character profile for a protagonist in a [GENRE] story. Include:\n\n**Basic Information:**\n- Name, age, occupation\n- Physical appearance\n- Background and upbringing\n\n**Personality:**\n- Core traits and quirks\n- Fears and motivations\n- Speech patterns\n\n**Story Arc:**\n- Initial state\n- Character growth\n- Final transformation",
        output: "",
        tags: &["creative-writing", "character-development", "storytelling"],
        is_favorite: false,
        is_template: true,
        created_at: "2024-01-18T09:20:00Z",
        updated_at: "2024-01-18T09:20:00Z",
    },
    Sample {
        id: "prompt-3",
        collection_id: Some("col-1"),
        title: "Social Media Content Calendar",
        content: "Create a 30-day social media content calendar for [BRAND/BUSINESS]. Include:\n\n**Content Mix:**\n- Educational posts (40%)\n- Behind-the-scenes (20%)\n- User-generated content (20%)\n- Promotional content (20%)\n\n**Engagement strategies:**\n- Questions to spark discussion\n- Trending hashtags\n- Call-to-action phrases\n- Best posting times",
        output: "Week 1 Content Calendar:\n\nMonday - Educational Post\n\"5 Common Mistakes in [INDUSTRY] and How to Avoid Them\"\nPlatforms: LinkedIn, Facebook",
        tags: &["social-media", "content-calendar", "marketing", "planning"],
        is_favorite: true,
        is_template: false,
        created_at: "2024-01-19T14:15:00Z",
        updated_at: "2024-01-21T16:45:00Z",
    },
    Sample {
        id: "prompt-4",
        collection_id: Some("col-3"),
        title: "API Documentation Template",
        content: "Create comprehensive API documentation for [API NAME]. Structure:\n\n**Overview:**\n- Purpose and functionality\n- Authentication requirements\n- Base URL and versioning\n\n**Endpoints:**\nFor each endpoint include:\n- HTTP method and URL\n- Parameters (required/optional)\n- Request and response examples\n- Error codes and messages",
        output: "",
        tags: &["technical-writing", "api", "documentation", "development"],
        is_favorite: false,
        is_template: true,
        created_at: "2024-01-16T11:00:00Z",
        updated_at: "2024-01-16T11:00:00Z",
    },
    Sample {
        id: "prompt-5",
        collection_id: Some("col-2"),
        title: "Short Story Idea Generator",
        content: "Generate a unique short story concept using these elements:\n\n**Setting:** [SETTING]\n**Main Character:** A [PROFESSION] who has a secret ability to [POWER]\n**Conflict:** They must [ACTION] before [TIME LIMIT] or [CONSEQUENCE]\n**Tone:** [TONE]\n\nDevelop this into a 2-3 sentence story premise that could be expanded into a 1000-word short story.",
        output: "In an underwater research colony, marine biologist Dr. Sarah Chen discovers she can communicate telepathically with deep-sea creatures.",
        tags: &["creative-writing", "story-ideas", "fiction", "brainstorming"],
        is_favorite: true,
        is_template: false,
        created_at: "2024-01-21T13:30:00Z",
        updated_at: "2024-01-21T18:45:00Z",
    },
    Sample {
        id: "prompt-6",
        collection_id: None,
        title: "Meeting Summary Template",
        content: "Summarize the key points from [MEETING TYPE] held on [DATE]. Include:\n\n**Meeting Details:**\n- Date, time, duration\n- Attendees\n\n**Action Items:**\n- Task description\n- Assigned person\n- Due date\n\n**Next Steps:**\n- Follow-up meetings\n- Deadlines to track",
        output: "",
        tags: &["productivity", "meetings", "business", "organization"],
        is_favorite: false,
        is_template: true,
        created_at: "2024-01-17T10:45:00Z",
        updated_at: "2024-01-17T10:45:00Z",
    },
];

/// Demo collections and prompts owned by `user_id`
pub fn demo_state(user_id: &str) -> VaultState {
    let collections = vec![
        collection(
            "col-1",
            user_id,
            "Marketing Copy",
            "Prompts for creating compelling marketing content",
            "#3B82F6",
            "2024-01-15T10:00:00Z",
        ),
        collection(
            "col-2",
            user_id,
            "Creative Writing",
            "Story ideas and creative writing prompts",
            "#8B5CF6",
            "2024-01-10T14:30:00Z",
        ),
        collection(
            "col-3",
            user_id,
            "Technical Documentation",
            "Prompts for technical writing and documentation",
            "#10B981",
            "2024-01-05T09:15:00Z",
        ),
    ];

    let prompts = SAMPLES
        .iter()
        .map(|s| Prompt {
            id: s.id.to_string(),
            user_id: user_id.to_string(),
            collection_id: s.collection_id.map(str::to_string),
            title: s.title.to_string(),
            content: s.content.to_string(),
            output: s.output.to_string(),
            tags: s.tags.iter().map(|t| t.to_string()).collect(),
            is_favorite: s.is_favorite,
            is_template: s.is_template,
            created_at: ts(s.created_at),
            updated_at: ts(s.updated_at),
        })
        .collect();

    VaultState {
        prompts,
        collections,
    }
}
