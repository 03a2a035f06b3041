//! Identifier casing for generated names.
//!
//! Words are split on any non-alphanumeric character, on lower-to-upper
//! transitions (`truckItems`), before the last capital of an acronym
//! (`XMLHttp`) and between letters and digits (`item2`).

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CharClass {
    Lower,
    Upper,
    Digit,
    /// Alphanumeric without case, e.g. CJK.
    Other,
}

fn class_of(c: char) -> Option<CharClass> {
    if !c.is_alphanumeric() {
        None
    } else if c.is_numeric() {
        Some(CharClass::Digit)
    } else if c.is_uppercase() {
        Some(CharClass::Upper)
    } else if c.is_lowercase() {
        Some(CharClass::Lower)
    } else {
        Some(CharClass::Other)
    }
}

/// Split `input` into words.
pub fn words(input: &str) -> Vec<String> {
    let chars: Vec<char> = input.chars().collect();
    let mut words = Vec::new();
    let mut current = String::new();

    for (i, &c) in chars.iter().enumerate() {
        let Some(class) = class_of(c) else {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            continue;
        };

        if let Some(prev) = chars.get(i.wrapping_sub(1)).copied().and_then(class_of) {
            if !current.is_empty() {
                let next = chars.get(i + 1).copied().and_then(class_of);
                let boundary = match (prev, class) {
                    (CharClass::Lower, CharClass::Upper) => true,
                    (CharClass::Upper, CharClass::Upper) => next == Some(CharClass::Lower),
                    (CharClass::Digit, CharClass::Digit) => false,
                    (CharClass::Digit, _) | (_, CharClass::Digit) => true,
                    _ => false,
                };
                if boundary {
                    words.push(std::mem::take(&mut current));
                }
            }
        }
        current.push(c);
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}

fn capitalize(word: &str) -> String {
    let lower = word.to_lowercase();
    let mut chars = lower.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// `truck items` / `truck-items` / `TRUCK_ITEMS` → `TruckItems`.
pub fn pascal_case(input: &str) -> String {
    words(input).iter().map(|w| capitalize(w)).collect()
}

/// `Truck Items` → `truckItems`.
pub fn camel_case(input: &str) -> String {
    words(input)
        .iter()
        .enumerate()
        .map(|(i, w)| if i == 0 { w.to_lowercase() } else { capitalize(w) })
        .collect()
}

/// True when `name` can be used as a type or function name.
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_alphabetic() || first == '_' || first == '$' => {
            chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$')
        }
        _ => false,
    }
}
