//! Entity and table name inflection.
//!
//! Table names are snake_case plurals (`task_attachments`), class names are
//! StudlyCase singulars (`TaskAttachment`). Inflection only touches the last
//! word of a compound name so prefixes survive unchanged.

use std::fmt;

use heck::{ToLowerCamelCase, ToPascalCase, ToSnakeCase};

const UNCOUNTABLE: &[&str] = &[
    "audio",
    "cattle",
    "data",
    "deer",
    "education",
    "equipment",
    "evidence",
    "feedback",
    "firmware",
    "fish",
    "furniture",
    "hardware",
    "information",
    "knowledge",
    "metadata",
    "money",
    "news",
    "police",
    "rice",
    "series",
    "sheep",
    "software",
    "species",
    "traffic",
];

/// Irregular (singular, plural) pairs.
const IRREGULAR: &[(&str, &str)] = &[
    ("analysis", "analyses"),
    ("avalanche", "avalanches"),
    ("bonus", "bonuses"),
    ("buffalo", "buffaloes"),
    ("cache", "caches"),
    ("cactus", "cacti"),
    ("campus", "campuses"),
    ("census", "censuses"),
    ("child", "children"),
    ("cliche", "cliches"),
    ("cookie", "cookies"),
    ("criterion", "criteria"),
    ("focus", "foci"),
    ("foot", "feet"),
    ("goose", "geese"),
    ("half", "halves"),
    ("headache", "headaches"),
    ("hero", "heroes"),
    ("knife", "knives"),
    ("leaf", "leaves"),
    ("life", "lives"),
    ("man", "men"),
    ("mouse", "mice"),
    ("movie", "movies"),
    ("niche", "niches"),
    ("ox", "oxen"),
    ("person", "people"),
    ("potato", "potatoes"),
    ("quiz", "quizzes"),
    ("tomato", "tomatoes"),
    ("tooth", "teeth"),
    ("virus", "viruses"),
    ("wife", "wives"),
    ("woman", "women"),
];

/// A name that can be rendered in the forms a Laravel project expects.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NameStr {
    raw: String,
}

impl NameStr {
    pub fn new(raw: impl Into<String>) -> Self {
        Self { raw: raw.into() }
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn plural(&self) -> String {
        pluralize(&self.raw)
    }

    pub fn singular(&self) -> String {
        singularize(&self.raw)
    }

    pub fn snake(&self) -> String {
        self.raw.to_snake_case()
    }

    /// lowerCamelCase (`task_attachments` → `taskAttachments`).
    pub fn camel(&self) -> String {
        self.raw.to_lower_camel_case()
    }

    /// StudlyCase (`task_attachments` → `TaskAttachments`).
    pub fn studly(&self) -> String {
        self.raw.to_pascal_case()
    }

    pub fn uc_first(&self) -> String {
        uc_first(&self.raw)
    }

    /// Class name form: `tasks` → `Task`, `product` → `Product`.
    pub fn uc_first_singular(&self) -> String {
        singularize(&self.raw).to_pascal_case()
    }

    /// Table name form: `TaskAttachment` → `task_attachments`.
    pub fn plural_snake(&self) -> String {
        pluralize(&self.raw).to_snake_case()
    }
}

impl fmt::Display for NameStr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl From<&str> for NameStr {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Uppercase the first character, leaving the rest untouched.
pub fn uc_first(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub fn pluralize(value: &str) -> String {
    inflect_last_word(value, pluralize_word)
}

pub fn singularize(value: &str) -> String {
    inflect_last_word(value, singularize_word)
}

fn inflect_last_word(value: &str, inflect: fn(&str) -> String) -> String {
    if value.is_empty() {
        return String::new();
    }

    let start = last_word_start(value);
    let (head, word) = value.split_at(start);
    let inflected = inflect(&word.to_lowercase());

    let restored = if word.chars().next().is_some_and(char::is_uppercase) {
        uc_first(&inflected)
    } else {
        inflected
    };

    format!("{head}{restored}")
}

/// Byte offset of the last word in a snake, kebab, spaced or Studly compound.
fn last_word_start(value: &str) -> usize {
    let mut start = 0;
    let mut prev: Option<char> = None;
    for (idx, ch) in value.char_indices() {
        if matches!(ch, '_' | '-' | ' ' | '\\' | '/') {
            start = idx + ch.len_utf8();
        } else if ch.is_uppercase() && prev.is_some_and(|p| p.is_lowercase() || p.is_numeric()) {
            start = idx;
        }
        prev = Some(ch);
    }
    start
}

fn pluralize_word(word: &str) -> String {
    if word.is_empty() || UNCOUNTABLE.contains(&word) {
        return word.to_string();
    }
    if let Some((_, plural)) = IRREGULAR.iter().find(|(singular, _)| *singular == word) {
        return (*plural).to_string();
    }
    if IRREGULAR.iter().any(|(_, plural)| *plural == word) {
        return word.to_string();
    }

    if word.ends_with("status") || word.ends_with("bus") || word.ends_with("alias") {
        return format!("{word}es");
    }
    if ["ss", "sh", "ch", "x", "z"]
        .iter()
        .any(|suffix| word.ends_with(suffix))
    {
        return format!("{word}es");
    }
    if word.ends_with("us") {
        return format!("{word}es");
    }
    if word.ends_with('s') {
        return word.to_string();
    }
    if let Some(stem) = word.strip_suffix('y') {
        if stem.chars().last().is_some_and(|c| !is_vowel(c)) {
            return format!("{stem}ies");
        }
    }

    format!("{word}s")
}

fn singularize_word(word: &str) -> String {
    if word.is_empty() || UNCOUNTABLE.contains(&word) {
        return word.to_string();
    }
    if let Some((singular, _)) = IRREGULAR.iter().find(|(_, plural)| *plural == word) {
        return (*singular).to_string();
    }
    if IRREGULAR.iter().any(|(singular, _)| *singular == word) {
        return word.to_string();
    }

    for suffix in ["statuses", "buses", "aliases"] {
        if word.ends_with(suffix) {
            return word[..word.len() - 2].to_string();
        }
    }
    if word.ends_with("ss") || word.ends_with("us") || word.ends_with("is") {
        return word.to_string();
    }
    if let Some(stem) = word.strip_suffix("ies") {
        if stem.len() > 1 && stem.chars().last().is_some_and(|c| !is_vowel(c)) {
            return format!("{stem}y");
        }
    }
    for suffix in ["sses", "shes", "ches", "xes", "zes"] {
        if word.ends_with(suffix) {
            return word[..word.len() - 2].to_string();
        }
    }
    if let Some(stem) = word.strip_suffix('s') {
        return stem.to_string();
    }

    word.to_string()
}

fn is_vowel(c: char) -> bool {
    matches!(c, 'a' | 'e' | 'i' | 'o' | 'u')
}
