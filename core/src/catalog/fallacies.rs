// Fallacy taxonomy

use super::{Category, FallacyCategory, Tag};

pub static FALLACIES: &[Tag] = &[
    Tag {
        id: "straw-man",
        name: "Straw Man",
        description: "Misrepresenting someone's argument to make it easier to attack.",
        category: Category::Fallacy(FallacyCategory::Informal),
        color: "#FF6B6B",
        examples: &[
            "Person A: We should have stricter environmental regulations. Person B: Person A wants to destroy all businesses and jobs.",
        ],
    },
    Tag {
        id: "ad-hominem",
        name: "Ad Hominem",
        description: "Attacking the person making the argument rather than the argument itself.",
        category: Category::Fallacy(FallacyCategory::Informal),
        color: "#FF8E72",
        examples: &[
            "You can't trust John's opinion on climate change - he's not even a scientist.",
        ],
    },
    Tag {
        id: "false-dilemma",
        name: "False Dilemma",
        description: "Presenting only two options when more exist.",
        category: Category::Fallacy(FallacyCategory::Informal),
        color: "#FFA94D",
        examples: &[
            "You're either with us or against us.",
            "Either we ban all cars or the planet will be destroyed.",
        ],
    },
    Tag {
        id: "slippery-slope",
        name: "Slippery Slope",
        description: "Arguing that one event will lead to a chain of negative events without evidence.",
        category: Category::Fallacy(FallacyCategory::Informal),
        color: "#FFD43B",
        examples: &[],
    },
    Tag {
        id: "appeal-to-authority",
        name: "Appeal to Authority",
        description: "Using an authority figure's opinion as evidence when they lack relevant expertise.",
        category: Category::Fallacy(FallacyCategory::Informal),
        color: "#A9E34B",
        examples: &[],
    },
    Tag {
        id: "red-herring",
        name: "Red Herring",
        description: "Introducing an irrelevant topic to divert attention from the original issue.",
        category: Category::Fallacy(FallacyCategory::RedHerring),
        color: "#C92A2A",
        examples: &[],
    },
    Tag {
        id: "tu-quoque",
        name: "Tu Quoque",
        description: "Deflecting criticism by pointing out the critic's similar behavior.",
        category: Category::Fallacy(FallacyCategory::RedHerring),
        color: "#D9480F",
        examples: &[],
    },
    Tag {
        id: "appeal-to-emotion",
        name: "Appeal to Emotion",
        description: "Using emotions rather than logic to persuade.",
        category: Category::Fallacy(FallacyCategory::RedHerring),
        color: "#A61E4D",
        examples: &[],
    },
    Tag {
        id: "affirming-consequent",
        name: "Affirming the Consequent",
        description: "Assuming that if A implies B, then B implies A.",
        category: Category::Fallacy(FallacyCategory::Formal),
        color: "#4DABF7",
        examples: &[],
    },
    Tag {
        id: "denying-antecedent",
        name: "Denying the Antecedent",
        description: "Assuming that if A implies B, then not-A implies not-B.",
        category: Category::Fallacy(FallacyCategory::Formal),
        color: "#748FFC",
        examples: &[],
    },
    Tag {
        id: "hasty-generalization",
        name: "Hasty Generalization",
        description: "Drawing a broad conclusion from a small or unrepresentative sample.",
        category: Category::Fallacy(FallacyCategory::FaultyGeneralization),
        color: "#9775FA",
        examples: &[],
    },
    Tag {
        id: "cherry-picking",
        name: "Cherry Picking",
        description: "Selecting only evidence that supports your conclusion while ignoring contradicting evidence.",
        category: Category::Fallacy(FallacyCategory::FaultyGeneralization),
        color: "#DA77F2",
        examples: &[],
    },
    Tag {
        id: "false-equivalence",
        name: "False Equivalence",
        description: "Treating two different things as if they are the same.",
        category: Category::Fallacy(FallacyCategory::Propositional),
        color: "#F783AC",
        examples: &[],
    },
    Tag {
        id: "composition",
        name: "Composition",
        description: "Assuming what is true of the parts is true of the whole.",
        category: Category::Fallacy(FallacyCategory::Quantification),
        color: "#F76707",
        examples: &[],
    },
    Tag {
        id: "division",
        name: "Division",
        description: "Assuming what is true of the whole is true of the parts.",
        category: Category::Fallacy(FallacyCategory::Quantification),
        color: "#E8590C",
        examples: &[],
    },
    Tag {
        id: "undistributed-middle",
        name: "Undistributed Middle",
        description: "The middle term in a syllogism is not distributed in at least one premise.",
        category: Category::Fallacy(FallacyCategory::Syllogistic),
        color: "#69DB7C",
        examples: &[],
    },
    Tag {
        id: "begging-question",
        name: "Begging the Question",
        description: "The conclusion is assumed in one of the premises.",
        category: Category::Fallacy(FallacyCategory::Conditional),
        color: "#38D9A9",
        examples: &[],
    },
    Tag {
        id: "circular-reasoning",
        name: "Circular Reasoning",
        description: "The argument's conclusion is used as one of its premises.",
        category: Category::Fallacy(FallacyCategory::Conditional),
        color: "#3BC9DB",
        examples: &[],
    },
];
