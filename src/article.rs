//! Turns a headline into a satirical article. The transformation is pure
//! string work: uppercase the headline and bolt on a random exclamation tag
//! for the title, then render a body by drawing one [`Voice`] at random and
//! substituting the headline into that voice's fixed sentence skeletons.
//! Rendering cannot fail; all randomness comes through the caller's RNG so
//! tests can seed it.

use crate::headlines::Headline;
use chrono::FixedOffset;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Display format for every timestamp the site shows.
pub const DATE_FORMAT: &str = "%B %d, %Y at %I:%M %p CST";

/// The fixed UTC-6 offset all timestamps are rendered in.
pub fn central_time() -> FixedOffset {
    FixedOffset::west_opt(6 * 3600).unwrap()
}

/// The persisted summary of one generated article. These four fields, under
/// exactly these names, are what the archive stores; the rendered page body
/// is written to disk once and never retained.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleRecord {
    pub title: String,
    pub slug: String,
    pub date: String,
    pub image: String,
}

/// A fully rendered article before it has been assigned a slug or a date.
pub struct Draft {
    pub title: String,
    pub body: String,
    pub image: String,
    pub source_url: Option<String>,
}

const TITLE_TAGS: [&str; 5] = [
    "EXCLUSIVE",
    "BREAKING",
    "DEVELOPING",
    "SHOCKING",
    "UNBELIEVABLE",
];

const PLACEHOLDER_PALETTE: [&str; 6] =
    ["FF6B6B", "4ECDC4", "45B7D1", "FFA07A", "98D8C8", "F7DC6F"];

/// Renders one headline into a [`Draft`]: sensational title, voice body,
/// and an image (the upstream one when the payload carried it, otherwise a
/// placeholder).
pub fn draft<R: Rng>(headline: &Headline, rng: &mut R) -> Draft {
    let voice = Voice::choose(rng);
    Draft {
        title: sensational_title(&headline.title, rng),
        body: voice.render(&headline.title, rng),
        image: headline
            .image
            .clone()
            .unwrap_or_else(|| placeholder_image(&headline.title)),
        source_url: headline.url.clone(),
    }
}

fn sensational_title<R: Rng>(headline: &str, rng: &mut R) -> String {
    format!(
        "{} - {}",
        headline.to_uppercase(),
        TITLE_TAGS.choose(rng).unwrap()
    )
}

/// Placeholder image URL with a palette color picked by hashing the
/// headline, so the same headline always gets the same color.
pub fn placeholder_image(headline: &str) -> String {
    let hash = Sha256::digest(headline.as_bytes());
    let color = PLACEHOLDER_PALETTE[hash[0] as usize % PLACEHOLDER_PALETTE.len()];
    format!(
        "https://via.placeholder.com/1200x600/{}/FFFFFF?text=Breaking+News",
        color
    )
}

/// One fixed satirical writing style. A uniform draw picks the voice for
/// each article; each variant owns one renderer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Voice {
    /// Deadpan wire-service parody.
    Newsroom,

    /// Exasperated stand-up comedian.
    Roast,

    /// Everything is connected.
    Conspiracy,

    /// A long complaint about how things used to be.
    Nostalgic,

    /// Play-by-play commentary for something that is not a game.
    SportsDesk,
}

impl Voice {
    pub const ALL: [Voice; 5] = [
        Voice::Newsroom,
        Voice::Roast,
        Voice::Conspiracy,
        Voice::Nostalgic,
        Voice::SportsDesk,
    ];

    pub fn choose<R: Rng>(rng: &mut R) -> Voice {
        *Self::ALL.choose(rng).unwrap()
    }

    /// Renders the body paragraphs for `headline` in this voice. The first
    /// paragraph always works the headline in; the middle paragraphs are
    /// shuffled and sub-sampled from fixed pools so length and order vary
    /// between runs.
    pub fn render<R: Rng>(self, headline: &str, rng: &mut R) -> String {
        match self {
            Voice::Newsroom => newsroom(headline, rng),
            Voice::Roast => roast(headline, rng),
            Voice::Conspiracy => conspiracy(headline, rng),
            Voice::Nostalgic => nostalgic(headline, rng),
            Voice::SportsDesk => sports_desk(headline, rng),
        }
    }
}

// The first five words of the lowercased headline. Long headlines get
// unwieldy in the middle of a sentence.
fn subject(headline: &str) -> String {
    let lower = headline.to_lowercase();
    let words: Vec<&str> = lower.split_whitespace().collect();
    if words.len() > 5 {
        words[..5].join(" ")
    } else {
        lower.trim().to_owned()
    }
}

fn paragraph(text: &str) -> String {
    format!("<p>{}</p>", text)
}

// Shuffles the middle pools together and keeps a random-sized prefix, so no
// two renderings of the same voice read quite the same.
fn shuffled_middle<'a, R: Rng>(
    pools: &[&'a [&'a str]],
    keep: std::ops::RangeInclusive<usize>,
    rng: &mut R,
) -> Vec<&'a str> {
    let mut blocks: Vec<&str> = pools.iter().flat_map(|pool| pool.iter().copied()).collect();
    blocks.shuffle(rng);
    let keep = rng.gen_range(keep).min(blocks.len());
    blocks.truncate(keep);
    blocks
}

fn newsroom<R: Rng>(headline: &str, rng: &mut R) -> String {
    let subject = subject(headline);
    let openings = [
        format!("In a move that surprised nobody, {}.", subject),
        format!("Breaking: {}. The universe shrugged.", subject),
        format!("Nation says 'well, that figures' as {}.", subject),
    ];
    const QUOTES: &[&str] = &[
        "\"This is definitely happening,\" confirmed Captain Obvious.",
        "\"I am deeply concerned,\" said a local concern-haver.",
        "\"Well, that escalated,\" noted an obvious observer.",
        "\"We are monitoring the situation,\" said someone paid to say exactly that.",
    ];
    const DETAILS: &[&str] = &[
        "Our team spent whole minutes on this story.",
        "Social media erupted in its usual fashion.",
        "Experts remain divided, mostly about dinner plans.",
        "Polls show half the country has one opinion and the other half has the opposite one.",
    ];
    const CLOSERS: &[&str] = &[
        "More updates coming, probably.",
        "The nation watches closely, then immediately checks its phone.",
        "This concludes our coverage of something nobody will remember by Friday.",
    ];

    let mut paragraphs = vec![format!(
        "<p><strong>BREAKING:</strong> {}</p>",
        openings.choose(rng).unwrap()
    )];
    for block in shuffled_middle(&[QUOTES, DETAILS], 4..=6, rng) {
        paragraphs.push(paragraph(block));
    }
    paragraphs.push(paragraph(CLOSERS.choose(rng).unwrap()));
    paragraphs.join("\n")
}

fn roast<R: Rng>(headline: &str, rng: &mut R) -> String {
    let lower = headline.to_lowercase();
    let openings = [
        format!(
            "Oh, come on. {}? THIS is what we're doing now? This is what's important?",
            lower
        ),
        format!(
            "So let me get this straight: {}. And everybody's acting like it matters.",
            lower
        ),
        format!(
            "Here we go again. {}. Another day, another story that changes nothing.",
            lower
        ),
    ];
    const COMMENTARY: &[&str] = &[
        "Look, I'm not saying it isn't A thing. I'm saying it's not a thing WE need to care about. There's a difference!",
        "And everyone's got an opinion about it. EVERYONE. Suddenly every person with a phone is an expert.",
        "The media's treating this like the story of the year. It's Tuesday. It's not even a good Tuesday.",
        "Here's the part I love: nobody actually cares. But we're all going to pretend we do for about 48 hours.",
        "And the comments! Everyone's got a hot take, everyone's certain, nobody knows anything.",
    ];
    const FOLLOWUP: &[&str] = &[
        "So naturally the 'experts' came out of the woodwork. Because of COURSE they did.",
        "Somebody has already called for an investigation. An investigation! Into THIS!",
        "Now the politicians are weighing in. Great. Exactly what this needed.",
        "They've got charts about it. CHARTS. Somebody made a graph for this.",
    ];
    const CLOSERS: &[&str] = &[
        "Anyway, that's the news. Go do literally anything else with your day.",
        "That's it. That's the story. You're not smarter for having read it. You're welcome.",
        "Check back tomorrow, when something equally pointless will happen. Spoiler: it will.",
        "In conclusion: stuff happened, people yelled, nothing changed. Have a nice day.",
    ];

    let mut paragraphs = vec![paragraph(openings.choose(rng).unwrap())];
    for block in shuffled_middle(&[COMMENTARY, FOLLOWUP], 3..=5, rng) {
        paragraphs.push(paragraph(block));
    }
    paragraphs.push(paragraph(CLOSERS.choose(rng).unwrap()));
    paragraphs.join("\n")
}

fn conspiracy<R: Rng>(headline: &str, rng: &mut R) -> String {
    let subject = subject(headline);
    let openings = [
        format!(
            "Wake up, people: {}. And they announced it on a WEEKDAY. Think about that.",
            subject
        ),
        format!(
            "So {} just \"happened\", huh? Nothing just happens, friends.",
            subject
        ),
        format!(
            "They don't want you connecting the dots, but here it is: {}.",
            subject
        ),
    ];
    const EVIDENCE: &[&str] = &[
        "Page 437 of a document nobody has read allegedly explains everything. Coincidence?",
        "A guy on a forum called this three years ago. Three. Years. Ago.",
        "Notice how the birds went quiet right before the announcement. The BIRDS knew.",
        "Follow the money. The money leads to more money. That's how they get you.",
        "The mainstream coverage is suspiciously thorough, which is exactly what you'd expect from a cover-up.",
    ];
    const RHETORIC: &[&str] = &[
        "Ask yourself: who benefits? Then ask who benefits from you asking. Exactly.",
        "They'll call this a coincidence. They always do. That's step one of the playbook.",
        "Do your own research. Not that research. The other research.",
    ];
    const CLOSERS: &[&str] = &[
        "Stay vigilant. Stay skeptical. Stay subscribed to our newsletter.",
        "The truth is out there, and it is mildly disappointing.",
        "We'll be saying 'we told you so' right up until we quietly delete this post.",
    ];

    let mut paragraphs = vec![paragraph(openings.choose(rng).unwrap())];
    for block in shuffled_middle(&[EVIDENCE, RHETORIC], 3..=5, rng) {
        paragraphs.push(paragraph(block));
    }
    paragraphs.push(paragraph(CLOSERS.choose(rng).unwrap()));
    paragraphs.join("\n")
}

fn nostalgic<R: Rng>(headline: &str, rng: &mut R) -> String {
    let subject = subject(headline);
    let openings = [
        format!(
            "Back in my day we didn't have any of this. Now I turn on the news and {}. Unbelievable.",
            subject
        ),
        format!(
            "You kids won't remember this, but there was a time before {}. A simpler time.",
            subject
        ),
        format!(
            "I read the paper this morning, the actual paper, and apparently {}. In THIS economy.",
            subject
        ),
    ];
    const GRUMBLES: &[&str] = &[
        "We had three channels growing up, and all three of them knew better than to report nonsense like this.",
        "In 1974 this wouldn't even have made the back page, and we were grateful.",
        "Everything costs more now and makes less sense. I blame the apps.",
        "Nobody writes letters anymore. Maybe if they did, we wouldn't be in this mess.",
        "My neighbor agrees with me, and he fought in a war. Or near a war. A war was involved.",
    ];
    const WISDOM: &[&str] = &[
        "Mark my words: in six months nobody will remember any of this. Just like the hula hoop.",
        "The young people are glued to their phones about it. We were glued to things too, but they were radios.",
        "You want my advice? A long walk and a sensible dinner. Fixes most of what ails a country.",
    ];
    const CLOSERS: &[&str] = &[
        "Anyway, it was better before. It was always better before.",
        "Now if you'll excuse me, my program is on.",
        "That's all I have to say about that, which has never once stopped me before.",
    ];

    let mut paragraphs = vec![paragraph(openings.choose(rng).unwrap())];
    for block in shuffled_middle(&[GRUMBLES, WISDOM], 3..=5, rng) {
        paragraphs.push(paragraph(block));
    }
    paragraphs.push(paragraph(CLOSERS.choose(rng).unwrap()));
    paragraphs.join("\n")
}

fn sports_desk<R: Rng>(headline: &str, rng: &mut R) -> String {
    let subject = subject(headline);
    let openings = [
        format!("AND THERE IT IS, folks: {}! Nobody saw it coming except everybody!", subject),
        format!(
            "Welcome back to coverage you didn't ask for, where today {}!",
            subject
        ),
        format!(
            "What a sequence of events! {} \u{2014} and the crowd goes appropriately mild!",
            subject
        ),
    ];
    const PLAY_BY_PLAY: &[&str] = &[
        "Let's go to the replay. Yep, it's still happening. Tremendous execution of events occurring.",
        "The statistics on this one are remarkable: one (1) thing happened, at least once.",
        "You hate to see it, Jim. Well, actually, the ratings say you love to see it.",
        "Both sides came to play today, and by play we mean issue statements at each other.",
        "This is a rebuilding year for everyone involved. It's always a rebuilding year.",
    ];
    const COLOR: &[&str] = &[
        "Our analyst in the booth has drawn several arrows on the screen. None of them clarify anything.",
        "Coaches will tell you it comes down to fundamentals: wanting things and then announcing them.",
        "The fans are on their feet, mostly because the seating situation was never resolved.",
    ];
    const CLOSERS: &[&str] = &[
        "We'll have full analysis at eleven, and partial analysis continuously until then.",
        "That's the action for now. Up next: highlights of things that barely happened.",
        "They'll be talking about this one for minutes to come. Back to you in the studio.",
    ];

    let mut paragraphs = vec![paragraph(openings.choose(rng).unwrap())];
    for block in shuffled_middle(&[PLAY_BY_PLAY, COLOR], 3..=5, rng) {
        paragraphs.push(paragraph(block));
    }
    paragraphs.push(paragraph(CLOSERS.choose(rng).unwrap()));
    paragraphs.join("\n")
}

#[cfg(test)]
mod test {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(42)
    }

    #[test]
    fn test_central_time_is_utc_minus_six() {
        assert_eq!(central_time().local_minus_utc(), -6 * 3600);
    }

    #[test]
    fn test_title_is_uppercased_with_known_tag() {
        let title = sensational_title("Cat Elected Mayor", &mut rng());
        assert!(title.starts_with("CAT ELECTED MAYOR - "));
        let tag = title.rsplit(" - ").next().unwrap();
        assert!(TITLE_TAGS.contains(&tag));
    }

    #[test]
    fn test_placeholder_image_is_deterministic_and_in_palette() {
        let first = placeholder_image("Cat Elected Mayor");
        let second = placeholder_image("Cat Elected Mayor");
        assert_eq!(first, second);
        assert!(PLACEHOLDER_PALETTE.iter().any(|color| first.contains(color)));
    }

    #[test]
    fn test_distinct_headlines_can_differ_in_color() {
        // Not guaranteed for any particular pair, but this pair differs.
        assert_ne!(
            placeholder_image("Cat Elected Mayor"),
            placeholder_image("Man Wins Lottery")
        );
    }

    #[test]
    fn test_every_voice_works_the_headline_in() {
        let headline = "Cat Elected Mayor";
        for voice in Voice::ALL {
            let body = voice.render(headline, &mut rng());
            assert!(
                body.to_lowercase().contains("cat elected mayor"),
                "voice {:?} dropped the headline",
                voice
            );
            assert!(body.starts_with("<p>"));
            assert!(body.ends_with("</p>"));
        }
    }

    #[test]
    fn test_subject_truncates_to_five_words() {
        assert_eq!(
            subject("One Two Three Four Five Six Seven"),
            "one two three four five"
        );
        assert_eq!(subject("Cat Elected Mayor"), "cat elected mayor");
    }

    #[test]
    fn test_draft_prefers_upstream_image() {
        let headline = Headline {
            title: "Cat Elected Mayor".to_owned(),
            image: Some("https://example.org/cat.jpg".to_owned()),
            url: Some("https://example.org/story".to_owned()),
        };
        let draft = draft(&headline, &mut rng());
        assert_eq!(draft.image, "https://example.org/cat.jpg");
        assert_eq!(draft.source_url.as_deref(), Some("https://example.org/story"));
    }

    #[test]
    fn test_draft_synthesizes_image_when_upstream_has_none() {
        let headline = Headline {
            title: "Cat Elected Mayor".to_owned(),
            image: None,
            url: None,
        };
        let draft = draft(&headline, &mut rng());
        assert_eq!(draft.image, placeholder_image("Cat Elected Mayor"));
        assert!(draft.source_url.is_none());
    }

    #[test]
    fn test_record_round_trips_through_json() {
        let record = ArticleRecord {
            title: "CAT ELECTED MAYOR - EXCLUSIVE".to_owned(),
            slug: "cat-elected-mayor.html".to_owned(),
            date: "August 28, 2026 at 09:15 AM CST".to_owned(),
            image: placeholder_image("Cat Elected Mayor"),
        };
        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("\"slug\""));
        let back: ArticleRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }
}
