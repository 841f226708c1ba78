// Rhetoric taxonomy, grouped by ethos, pathos, logos and kairos

use super::{Category, RhetoricCategory, Tag};

pub static RHETORIC_TECHNIQUES: &[Tag] = &[
    Tag {
        id: "appeal-to-authority",
        name: "Appeal to Authority",
        description: "Citing experts or authorities to support a claim.",
        category: Category::Rhetoric(RhetoricCategory::Ethos),
        color: "#4C6EF5",
        examples: &[
            "According to Dr. Smith, a leading expert in climate science...",
        ],
    },
    Tag {
        id: "establishing-credibility",
        name: "Establishing Credibility",
        description: "Demonstrating expertise, experience, or trustworthiness.",
        category: Category::Rhetoric(RhetoricCategory::Ethos),
        color: "#5C7CFA",
        examples: &["As someone who has worked in this field for 20 years..."],
    },
    Tag {
        id: "shared-values",
        name: "Shared Values",
        description: "Connecting with the audience through common beliefs or principles.",
        category: Category::Rhetoric(RhetoricCategory::Ethos),
        color: "#748FFC",
        examples: &[
            "Like you, I believe in the importance of family and community.",
        ],
    },
    Tag {
        id: "testimonial",
        name: "Testimonial",
        description: "Using endorsements from respected individuals or groups.",
        category: Category::Rhetoric(RhetoricCategory::Ethos),
        color: "#91A7FF",
        examples: &["This product is recommended by 9 out of 10 dentists."],
    },
    Tag {
        id: "emotional-appeal",
        name: "Emotional Appeal",
        description: "Evoking feelings such as fear, hope, anger, or sympathy.",
        category: Category::Rhetoric(RhetoricCategory::Pathos),
        color: "#F03E3E",
        examples: &["Think of the children who will suffer if we don't act now."],
    },
    Tag {
        id: "storytelling",
        name: "Storytelling",
        description: "Using narratives to create emotional connection and engagement.",
        category: Category::Rhetoric(RhetoricCategory::Pathos),
        color: "#FA5252",
        examples: &["Let me tell you about Maria, a single mother who..."],
    },
    Tag {
        id: "vivid-imagery",
        name: "Vivid Imagery",
        description: "Using descriptive language to paint pictures and evoke emotions.",
        category: Category::Rhetoric(RhetoricCategory::Pathos),
        color: "#FF6B6B",
        examples: &[
            "Imagine waking up to the sound of birds singing, the smell of fresh coffee...",
        ],
    },
    Tag {
        id: "appeal-to-fear",
        name: "Appeal to Fear",
        description: "Warning of negative consequences to motivate action.",
        category: Category::Rhetoric(RhetoricCategory::Pathos),
        color: "#FF8787",
        examples: &[
            "If we don't address this issue now, the consequences could be catastrophic.",
        ],
    },
    Tag {
        id: "appeal-to-hope",
        name: "Appeal to Hope",
        description: "Inspiring optimism about positive outcomes.",
        category: Category::Rhetoric(RhetoricCategory::Pathos),
        color: "#FFA8A8",
        examples: &[
            "Together, we can build a brighter future for the next generation.",
        ],
    },
    Tag {
        id: "statistical-evidence",
        name: "Statistical Evidence",
        description: "Using data and statistics to support claims.",
        category: Category::Rhetoric(RhetoricCategory::Logos),
        color: "#12B886",
        examples: &[
            "Studies show that 78% of participants experienced improvement.",
        ],
    },
    Tag {
        id: "logical-reasoning",
        name: "Logical Reasoning",
        description: "Using deductive or inductive reasoning to reach conclusions.",
        category: Category::Rhetoric(RhetoricCategory::Logos),
        color: "#20C997",
        examples: &["If A leads to B, and B leads to C, then A must lead to C."],
    },
    Tag {
        id: "factual-evidence",
        name: "Factual Evidence",
        description: "Presenting verifiable facts to support arguments.",
        category: Category::Rhetoric(RhetoricCategory::Logos),
        color: "#38D9A9",
        examples: &[
            "The Earth orbits the Sun at approximately 67,000 miles per hour.",
        ],
    },
    Tag {
        id: "analogy",
        name: "Analogy",
        description: "Comparing similar situations to illustrate a point.",
        category: Category::Rhetoric(RhetoricCategory::Logos),
        color: "#63E6BE",
        examples: &[
            "Just as a ship needs a captain, an organization needs strong leadership.",
        ],
    },
    Tag {
        id: "cause-and-effect",
        name: "Cause and Effect",
        description: "Demonstrating how one event leads to another.",
        category: Category::Rhetoric(RhetoricCategory::Logos),
        color: "#96F2D7",
        examples: &[
            "Reducing carbon emissions will lead to cleaner air and improved public health.",
        ],
    },
    Tag {
        id: "urgency",
        name: "Urgency",
        description: "Emphasizing the need for immediate action.",
        category: Category::Rhetoric(RhetoricCategory::Kairos),
        color: "#F59F00",
        examples: &["Act now - this offer expires at midnight!"],
    },
    Tag {
        id: "timeliness",
        name: "Timeliness",
        description: "Connecting arguments to current events or trends.",
        category: Category::Rhetoric(RhetoricCategory::Kairos),
        color: "#FAB005",
        examples: &[
            "In light of recent developments, it's more important than ever to...",
        ],
    },
    Tag {
        id: "historical-moment",
        name: "Historical Moment",
        description: "Framing the situation as a pivotal point in history.",
        category: Category::Rhetoric(RhetoricCategory::Kairos),
        color: "#FCC419",
        examples: &["We stand at a crossroads that will define our generation."],
    },
    Tag {
        id: "seasonal-appeal",
        name: "Seasonal/Contextual Appeal",
        description: "Leveraging specific times, seasons, or contexts.",
        category: Category::Rhetoric(RhetoricCategory::Kairos),
        color: "#FFD43B",
        examples: &[
            "As we enter the holiday season, let's remember those less fortunate.",
        ],
    },
];
