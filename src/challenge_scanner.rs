// =============================================================================
// challenge_scanner.rs - THE CAPTCHA SNIFFER
// =============================================================================
//
// Before we try to read a case page, we check whether it is a case page at
// all. Court sites love to answer a perfectly reasonable GET with "please
// enter the characters shown in the image", and running the field extractor
// over that would cheerfully report a petitioner named "Refresh Image".
//
// How it works:
//
// 1. Lowercase the whole body once.
// 2. Run a single Aho-Corasick pass over it for every piece of challenge
//    vocabulary we know, with overlapping matches, so "enter captcha" also
//    counts as "captcha".
// 3. Walk an ordered rule table. A rule fires when ALL of its phrases were
//    seen. First rule to fire wins.
//
// The rules:
//   - "captcha" AND "enter the"   (the word alone shows up in footers)
//   - "enter captcha"             (the input label)
//   - "refresh image"             (the reload button next to the image)
//
// Known limitation: this is vocabulary matching, not understanding. A normal
// page that happens to say "enter the" somewhere and mentions captcha in its
// footer gets classified as a challenge. Known, accepted; do not "fix" it by
// guessing at the court's markup.
// =============================================================================

use aho_corasick::AhoCorasick;
use std::sync::LazyLock;
use tracing::debug;

/// A piece of challenge-UI vocabulary. The discriminant doubles as the
/// pattern id inside the automaton.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phrase {
    Captcha = 0,
    EnterThe = 1,
    EnterCaptcha = 2,
    RefreshImage = 3,
}

impl Phrase {
    const ALL: [Phrase; 4] = [
        Phrase::Captcha,
        Phrase::EnterThe,
        Phrase::EnterCaptcha,
        Phrase::RefreshImage,
    ];

    pub fn text(self) -> &'static str {
        match self {
            Phrase::Captcha => "captcha",
            Phrase::EnterThe => "enter the",
            Phrase::EnterCaptcha => "enter captcha",
            Phrase::RefreshImage => "refresh image",
        }
    }
}

/// One row of the rule table: fires when every phrase in `all_of` is present.
#[derive(Debug)]
pub struct ChallengeRule {
    pub name: &'static str,
    pub all_of: &'static [Phrase],
}

/// Ordered. Add new vocabulary here, not in control flow.
pub static CHALLENGE_RULES: &[ChallengeRule] = &[
    ChallengeRule {
        name: "captcha_with_prompt",
        all_of: &[Phrase::Captcha, Phrase::EnterThe],
    },
    ChallengeRule {
        name: "enter_captcha_label",
        all_of: &[Phrase::EnterCaptcha],
    },
    ChallengeRule {
        name: "refresh_image_control",
        all_of: &[Phrase::RefreshImage],
    },
];

/// Built once. Patterns are already lowercase and so is the haystack, so
/// the automaton itself stays case-sensitive.
static PHRASE_AUTOMATON: LazyLock<AhoCorasick> = LazyLock::new(|| {
    AhoCorasick::new(Phrase::ALL.map(Phrase::text))
        .expect("Failed to build challenge phrase automaton")
});

/// Which phrases appear anywhere in a body.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PhraseHits([bool; 4]);

impl PhraseHits {
    pub fn contains(&self, phrase: Phrase) -> bool {
        self.0[phrase as usize]
    }

    fn all_seen(&self) -> bool {
        self.0.iter().all(|seen| *seen)
    }
}

/// Scan a body for every known piece of challenge vocabulary.
pub fn scan_phrases(body: &str) -> PhraseHits {
    let lowered = body.to_lowercase();
    let mut hits = PhraseHits::default();

    for m in PHRASE_AUTOMATON.find_overlapping_iter(&lowered) {
        hits.0[m.pattern().as_usize()] = true;
        if hits.all_seen() {
            break;
        }
    }

    hits
}

/// Return the first rule in the table that fires for this body, if any.
pub fn detect_challenge(body: &str) -> Option<&'static ChallengeRule> {
    let hits = scan_phrases(body);

    let fired = CHALLENGE_RULES
        .iter()
        .find(|rule| rule.all_of.iter().all(|phrase| hits.contains(*phrase)));

    debug!(
        captcha = hits.contains(Phrase::Captcha),
        enter_the = hits.contains(Phrase::EnterThe),
        enter_captcha = hits.contains(Phrase::EnterCaptcha),
        refresh_image = hits.contains(Phrase::RefreshImage),
        rule = fired.map(|r| r.name).unwrap_or("none"),
        "Challenge scan complete"
    );

    fired
}

/// True when the body looks like an automation challenge rather than data.
pub fn classify(body: &str) -> bool {
    detect_challenge(body).is_some()
}
