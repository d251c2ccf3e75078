use async_trait::async_trait;
use rand::seq::SliceRandom;
use rand::Rng;
use std::time::Duration;

use super::{Generation, GenerationBackend, GenerationError};
use crate::config::Config;
use crate::models::ChatReply;

/// How a keyword is matched against the lowercased prompt
#[derive(Debug, Clone, Copy)]
enum Keyword {
    /// Anywhere in the text
    Substring(&'static str),
    /// As a standalone word ("hi" must not match "this")
    Word(&'static str),
}

impl Keyword {
    fn matches(self, text: &str) -> bool {
        match self {
            Keyword::Substring(k) => text.contains(k),
            Keyword::Word(k) => text
                .split(|c: char| !c.is_alphanumeric())
                .any(|word| word == k),
        }
    }
}

/// A keyword category and its pool of canned replies
#[derive(Debug)]
pub struct Category {
    pub name: &'static str,
    keywords: &'static [Keyword],
    pub replies: &'static [&'static str],
}

/// Categories in match order; the first match wins
pub static CATEGORIES: &[Category] = &[
    Category {
        name: "greeting",
        keywords: &[Keyword::Substring("hello"), Keyword::Word("hi")],
        replies: &[
            "Hello! I'm PrimerGPT, your friendly AI assistant. How can I help you today?",
            "Hi there! I'm ready to help you with any questions you might have.",
            "Greetings! I'm your AI assistant. What would you like to discuss?",
        ],
    },
    Category {
        name: "javascript",
        keywords: &[Keyword::Substring("javascript")],
        replies: &["JavaScript is a versatile programming language that powers the web. It's used for both front-end and back-end development, and features like async/await, closures, and the event loop make it powerful yet accessible."],
    },
    Category {
        name: "python",
        keywords: &[Keyword::Substring("python")],
        replies: &["Python is known for its readability and extensive library ecosystem. It's great for beginners and powers everything from web development to data science and AI."],
    },
    Category {
        name: "programming",
        keywords: &[Keyword::Substring("code"), Keyword::Substring("programming")],
        replies: &[
            "Programming is all about breaking down complex problems into smaller, manageable pieces. What specific aspect would you like to learn about?",
            "The world of coding is vast and exciting! We can discuss languages, frameworks, best practices, or specific programming concepts.",
            "Programming is a creative endeavor that combines logic, problem-solving, and design. What interests you most about it?",
        ],
    },
    Category {
        name: "help",
        keywords: &[Keyword::Substring("help")],
        replies: &["I can help you with:\n1. Programming questions and concepts\n2. Code explanations\n3. Best practices and tips\n4. General knowledge and discussions\nWhat would you like to know more about?"],
    },
    Category {
        name: "project",
        keywords: &[
            Keyword::Substring("project"),
            Keyword::Word("app"),
            Keyword::Substring("application"),
        ],
        replies: &["When working on projects, consider these key aspects:\n1. Clear requirements and goals\n2. Proper planning and architecture\n3. Version control and documentation\n4. Testing and quality assurance\n5. Deployment and maintenance\nWhich aspect would you like to discuss?"],
    },
];

/// Replies used when no category matches
pub static FALLBACK_REPLIES: &[&str] = &[
    "That's an interesting topic! Let's explore it together.",
    "I understand what you're asking about. Here's what I think...",
    "Great question! From my analysis...",
    "I'd be happy to help you with that. Here's my perspective...",
    "Let me share my thoughts on this topic...",
];

/// Find the first category whose keywords appear in the prompt
pub fn classify(prompt: &str) -> Option<&'static Category> {
    let text = prompt.to_lowercase();
    CATEGORIES
        .iter()
        .find(|category| category.keywords.iter().any(|k| k.matches(&text)))
}

/// Pick a reply uniformly at random from the matching pool
pub fn pick_reply(prompt: &str) -> &'static str {
    let pool = classify(prompt).map_or(FALLBACK_REPLIES, |c| c.replies);
    pool.choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or(FALLBACK_REPLIES[0])
}

/// Keyword-matching responder with artificial latency
#[derive(Debug, Clone)]
pub struct MockBackend {
    min_delay: Duration,
    max_delay: Duration,
}

impl MockBackend {
    pub fn new(min_delay: Duration, max_delay: Duration) -> Self {
        Self {
            min_delay,
            max_delay: max_delay.max(min_delay),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            Duration::from_millis(config.mock_min_delay_ms),
            Duration::from_millis(config.mock_max_delay_ms),
        )
    }

    /// Answer a chat message with a full reply object
    pub async fn respond(&self, content: &str) -> ChatReply {
        self.simulate_latency().await;
        ChatReply::assistant(pick_reply(content))
    }

    async fn simulate_latency(&self) {
        if self.max_delay.is_zero() {
            return;
        }
        let delay = rand::thread_rng().gen_range(self.min_delay..=self.max_delay);
        tokio::time::sleep(delay).await;
    }
}

#[async_trait]
impl GenerationBackend for MockBackend {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn generate(&self, prompt: &str) -> Result<Generation, GenerationError> {
        self.simulate_latency().await;
        Ok(Generation::text(pick_reply(prompt)))
    }

    async fn health_check(&self) -> Result<(), GenerationError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn category_name(prompt: &str) -> Option<&'static str> {
        classify(prompt).map(|c| c.name)
    }

    fn instant() -> MockBackend {
        MockBackend::new(Duration::ZERO, Duration::ZERO)
    }

    #[test]
    fn test_hello_is_greeting() {
        assert_eq!(category_name("hello"), Some("greeting"));
        assert_eq!(category_name("Well, HELLO there"), Some("greeting"));
        assert_eq!(category_name("hi"), Some("greeting"));
        assert_eq!(category_name("Hi, can you help?"), Some("greeting"));
    }

    #[test]
    fn test_greeting_takes_precedence() {
        assert_eq!(category_name("hello, I need help with python"), Some("greeting"));
    }

    #[test]
    fn test_categories_in_order() {
        assert_eq!(category_name("Tell me about JavaScript"), Some("javascript"));
        assert_eq!(category_name("python or javascript?"), Some("javascript"));
        assert_eq!(category_name("I love Python"), Some("python"));
        assert_eq!(category_name("write some code"), Some("programming"));
        assert_eq!(category_name("please help"), Some("help"));
        assert_eq!(category_name("my new project"), Some("project"));
        assert_eq!(category_name("a mobile app"), Some("project"));
        assert_eq!(category_name("web application design"), Some("project"));
    }

    #[test]
    fn test_short_keywords_need_word_boundaries() {
        assert_eq!(category_name("something happy"), None);
        assert_eq!(category_name("this apple"), None);
        assert_eq!(category_name("can you help with this"), Some("help"));
        assert_eq!(category_name("hi, can you help"), Some("greeting"));
        assert_eq!(category_name("my new app"), Some("project"));
    }

    #[test]
    fn test_empty_prompt_uses_fallback_pool() {
        assert_eq!(category_name(""), None);
        assert!(FALLBACK_REPLIES.contains(&pick_reply("")));
    }

    #[test]
    fn test_unmatched_prompt_uses_fallback_pool() {
        assert_eq!(category_name("tell me a joke"), None);
        for _ in 0..20 {
            assert!(FALLBACK_REPLIES.contains(&pick_reply("tell me a joke")));
        }
    }

    #[test]
    fn test_hello_never_uses_fallback_pool() {
        let greeting = &CATEGORIES[0];
        for _ in 0..20 {
            let reply = pick_reply("hello");
            assert!(greeting.replies.contains(&reply));
            assert!(!FALLBACK_REPLIES.contains(&reply));
        }
    }

    #[tokio::test]
    async fn test_generate_returns_text() {
        let generation = instant().generate("hello").await.unwrap();

        assert!(!generation.text.is_empty());
        assert!(generation.total_duration.is_none());
    }

    #[tokio::test]
    async fn test_respond_builds_assistant_reply() {
        let reply = instant().respond("python").await;

        assert_eq!(reply.kind, "assistant");
        assert!(reply.content.starts_with("Python"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_latency_within_bounds() {
        let backend = MockBackend::new(Duration::from_millis(500), Duration::from_millis(1500));
        let start = tokio::time::Instant::now();

        backend.generate("hello").await.unwrap();

        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_millis(500));
        assert!(elapsed <= Duration::from_millis(1600));
    }
}
