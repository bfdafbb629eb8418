//! Built-in vocabulary exercises.
//!
//! Each path node maps to a fixed slice of the vocabulary table, so a node
//! always shows the same exercises for a given language.

use serde::{Deserialize, Serialize};

/// Exercises in one path node
pub const EXERCISES_PER_SET: usize = 3;

/// Columns of `VOCABULARY` after the English gloss
const COLUMNS: &[&str] = &["Spanish", "French", "German", "Italian", "Portuguese"];

/// English gloss, then accepted answers per column ('|' separates alternatives)
const VOCABULARY: &[(&str, [&str; 5])] = &[
    ("hello", ["hola", "bonjour|salut", "hallo", "ciao", "olá|oi"]),
    ("thank you", ["gracias", "merci", "danke", "grazie", "obrigado|obrigada"]),
    ("water", ["agua", "eau", "Wasser", "acqua", "água"]),
    ("bread", ["pan", "pain", "Brot", "pane", "pão"]),
    ("house", ["casa", "maison", "Haus", "casa", "casa"]),
    ("cat", ["gato", "chat", "Katze", "gatto", "gato"]),
    ("dog", ["perro", "chien", "Hund", "cane", "cão|cachorro"]),
    ("book", ["libro", "livre", "Buch", "libro", "livro"]),
    ("friend", ["amigo|amiga", "ami|amie", "Freund|Freundin", "amico|amica", "amigo|amiga"]),
    ("good morning", ["buenos días", "bonjour", "guten Morgen", "buongiorno", "bom dia"]),
    ("goodbye", ["adiós", "au revoir", "auf Wiedersehen|tschüss", "arrivederci", "adeus|tchau"]),
    ("please", ["por favor", "s'il vous plaît|s'il te plaît", "bitte", "per favore", "por favor"]),
    ("apple", ["manzana", "pomme", "Apfel", "mela", "maçã"]),
    ("school", ["escuela", "école", "Schule", "scuola", "escola"]),
    ("night", ["noche", "nuit", "Nacht", "notte", "noite"]),
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exercise {
    pub prompt: String,
    pub answers: Vec<String>,
    pub hint: String,
}

impl Exercise {
    /// Case-, whitespace- and punctuation-insensitive comparison
    pub fn accepts(&self, answer: &str) -> bool {
        let given = normalize(answer);
        !given.is_empty() && self.answers.iter().any(|a| normalize(a) == given)
    }

    pub fn expected(&self) -> &str {
        self.answers.first().map(String::as_str).unwrap_or("")
    }
}

fn normalize(text: &str) -> String {
    text.trim()
        .trim_matches(|c: char| matches!(c, '.' | '!' | '?' | '¡' | '¿' | ',') || c.is_whitespace())
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Strip a regional qualifier: "Portuguese (Brazilian)" -> "Portuguese"
fn base_language(name: &str) -> &str {
    name.split('(').next().unwrap_or(name).trim()
}

/// Exercises for path node `node` in `language`; `None` if the language has no vocabulary
pub fn exercise_set(language: &str, node: usize) -> Option<Vec<Exercise>> {
    let base = base_language(language);
    let start = (node * EXERCISES_PER_SET) % VOCABULARY.len();
    let rows = (0..EXERCISES_PER_SET).map(|i| &VOCABULARY[(start + i) % VOCABULARY.len()]);

    if base.eq_ignore_ascii_case("English") {
        // English learners translate from Spanish.
        return Some(
            rows.map(|(gloss, cols)| exercise(cols[0], gloss))
                .collect(),
        );
    }

    let column = COLUMNS.iter().position(|c| c.eq_ignore_ascii_case(base))?;
    Some(
        rows.map(|(gloss, cols)| exercise(gloss, cols[column]))
            .collect(),
    )
}

fn exercise(source: &str, answers: &str) -> Exercise {
    let prompt = source.split('|').next().unwrap_or(source).to_string();
    let answers: Vec<String> = answers.split('|').map(str::to_string).collect();
    let hint = answers
        .first()
        .and_then(|a| a.chars().next())
        .map(|c| format!("starts with '{}'", c))
        .unwrap_or_default();
    Exercise {
        prompt,
        answers,
        hint,
    }
}

/// Languages with built-in exercises
pub fn languages_with_exercises() -> Vec<&'static str> {
    let mut names = vec!["English"];
    names.extend_from_slice(COLUMNS);
    names
}
