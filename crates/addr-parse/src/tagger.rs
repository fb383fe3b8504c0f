//! Rule-based tagger for US addresses, the default domestic backend.
//!
//! Works right to left: optional country, ZIP, state, then city, leaving the
//! street line (number, directionals, street type, unit or PO box) at the
//! front. Labels are [`addr_model::AddressField`] names; tokens it cannot
//! place are left out.

use addr_standards::{countries, states};

use crate::backend::{DomesticBackend, LabeledToken};
use crate::error::BackendError;

const DIRECTIONALS: [&str; 16] = [
    "n", "s", "e", "w", "ne", "nw", "se", "sw", "north", "south", "east", "west", "northeast",
    "northwest", "southeast", "southwest",
];

const STREET_TYPES: [&str; 58] = [
    "st", "street", "ave", "av", "avenue", "blvd", "boulevard", "rd", "road", "dr", "drive", "ln",
    "lane", "ct", "court", "pl", "place", "pkwy", "parkway", "hwy", "highway", "cir", "circle",
    "ter", "terrace", "trl", "trail", "way", "sq", "square", "loop", "pike", "row", "walk", "xing",
    "crossing", "expy", "expressway", "fwy", "freeway", "aly", "alley", "cv", "cove", "plz",
    "plaza", "pt", "point", "bnd", "bend", "holw", "hollow", "crk", "creek", "path", "tpke",
    "turnpike", "run",
];

const PRE_TYPES: [&str; 9] = [
    "hwy", "highway", "route", "rte", "interstate", "fm", "rr", "cr", "us",
];

const OCCUPANCY_TYPES: [&str; 15] = [
    "#", "apt", "apartment", "suite", "ste", "unit", "rm", "room", "lot", "spc", "space", "trlr",
    "trailer", "ph", "penthouse",
];

const SUBADDRESS_TYPES: [&str; 11] = [
    "bldg", "building", "fl", "floor", "dept", "department", "wing", "hngr", "hangar", "pier",
    "slip",
];

const PO_BOX_FORMS: [&[&str]; 4] =
    [&["po", "box"], &["post", "office", "box"], &["pob"], &["pobox"]];

/// Default domestic backend. Needs no external resources.
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleBasedTagger;

impl DomesticBackend for RuleBasedTagger {
    fn name(&self) -> &str {
        "rules"
    }

    fn tag(&self, input: &str) -> Result<Vec<LabeledToken>, BackendError> {
        let tokens = tokenize(input);
        let labels = label_tokens(&tokens);
        Ok(tokens
            .into_iter()
            .zip(labels)
            .filter_map(|(token, label)| label.map(|label| LabeledToken::new(token.text, label)))
            .collect())
    }
}

#[derive(Debug)]
struct Token {
    text: String,
    key: String,
    segment: usize,
}

impl Token {
    fn new(text: &str, segment: usize) -> Self {
        Self {
            text: text.to_string(),
            key: text.to_lowercase().replace('.', ""),
            segment,
        }
    }

    fn starts_with_digit(&self) -> bool {
        self.text.starts_with(|c: char| c.is_ascii_digit())
    }

    fn is_directional(&self) -> bool {
        DIRECTIONALS.contains(&self.key.as_str())
    }

    fn is_street_type(&self) -> bool {
        STREET_TYPES.contains(&self.key.as_str())
    }

    fn unit_label(&self) -> Option<(&'static str, &'static str)> {
        let key = self.key.as_str();
        if OCCUPANCY_TYPES.contains(&key) {
            Some(("OccupancyType", "OccupancyIdentifier"))
        } else if SUBADDRESS_TYPES.contains(&key) {
            Some(("SubaddressType", "SubaddressIdentifier"))
        } else {
            None
        }
    }
}

fn tokenize(input: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    for (segment, part) in input.split(',').enumerate() {
        for word in part.split_whitespace() {
            let word = word.trim_end_matches(';');
            // "#12" is a unit marker followed by its identifier.
            if let Some(rest) = word.strip_prefix('#')
                && !rest.is_empty()
            {
                tokens.push(Token::new("#", segment));
                tokens.push(Token::new(rest, segment));
            } else if !word.is_empty() {
                tokens.push(Token::new(word, segment));
            }
        }
    }
    tokens
}

type Labels = Vec<Option<&'static str>>;

fn label_tokens(tokens: &[Token]) -> Labels {
    let mut labels: Labels = vec![None; tokens.len()];
    let mut end = strip_country(tokens, &mut labels);

    let mut zip_at = None;
    if end > 0 {
        match zip_strength(tokens, end - 1) {
            ZipStrength::Strong => zip_at = Some(end - 1),
            ZipStrength::Weak if find_state(tokens, end - 1, true).is_some() => {
                zip_at = Some(end - 1);
            }
            ZipStrength::Weak | ZipStrength::None => {}
        }
    }
    if let Some(at) = zip_at {
        labels[at] = Some("ZipCode");
        end = at;
    }

    let state = find_state(tokens, end, zip_at.is_some());
    if let Some((start, state_end)) = state {
        labels[start..state_end].fill(Some("StateName"));
        end = start;
    }
    let has_locality = zip_at.is_some() || state.is_some();

    let city_start = city_start(tokens, end, has_locality);
    labels[city_start..end].fill(Some("PlaceName"));
    label_street(tokens, 0, city_start, &mut labels);
    labels
}

fn strip_country(tokens: &[Token], labels: &mut Labels) -> usize {
    let end = tokens.len();
    for n in (1..=4).rev() {
        if end <= n {
            continue;
        }
        let phrase = join_keys(&tokens[end - n..end]);
        if countries::is_domestic_name(&phrase) {
            labels[end - n..end].fill(Some("CountryName"));
            return end - n;
        }
    }
    end
}

enum ZipStrength {
    Strong,
    Weak,
    None,
}

fn zip_strength(tokens: &[Token], at: usize) -> ZipStrength {
    let text = tokens[at].text.as_str();
    // The number after "Box" is a box number.
    if at > 0 && tokens[at - 1].key == "box" {
        return ZipStrength::None;
    }
    let digits = |value: &str| !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit());
    let (head, tail) = match text.split_once('-') {
        Some((head, tail)) => (head, Some(tail)),
        None => (text, None),
    };
    match (head.len(), tail) {
        (5, Some(tail)) if digits(head) && digits(tail) => ZipStrength::Strong,
        (5 | 9, None) if digits(head) => ZipStrength::Strong,
        (3 | 4, None) if digits(head) && at > 0 => ZipStrength::Weak,
        _ => ZipStrength::None,
    }
}

/// State name or abbreviation ending right before `end`, as a token range.
fn find_state(tokens: &[Token], end: usize, after_zip: bool) -> Option<(usize, usize)> {
    for n in (1..=4).rev() {
        if end < n {
            continue;
        }
        let start = end - n;
        let span = &tokens[start..end];
        if span.iter().any(|token| token.segment != span[0].segment) {
            continue;
        }
        let phrase = join_keys(span);
        let matched = if n == 1 && phrase.len() == 2 {
            // "Ct" closing a street line is a street type, not Connecticut.
            states::is_abbreviation(&phrase) && (after_zip || !span[0].is_street_type())
        } else {
            states::abbreviation_for_name(&phrase).is_some()
        };
        if matched {
            return Some((start, end));
        }
    }
    None
}

/// Index where the city begins; `end` when there is none.
fn city_start(tokens: &[Token], end: usize, has_locality: bool) -> usize {
    if end == 0 {
        return 0;
    }
    let last_segment = tokens[end - 1].segment;
    if last_segment != tokens[0].segment {
        let start = tokens[..end]
            .iter()
            .position(|token| token.segment == last_segment)
            .unwrap_or(end);
        let first = &tokens[start];
        if first.starts_with_digit()
            || first.unit_label().is_some()
            || starts_po_box(tokens, start, end).is_some()
        {
            return end;
        }
        return start;
    }

    match street_end(tokens, 0, end) {
        Some(street_end) => street_end,
        // No street evidence: a bare locality such as "Austin TX".
        None if has_locality && !tokens[0].starts_with_digit() => 0,
        None => end,
    }
}

/// End of the street line within `start..end`, found from the street type,
/// PO box or unit designator.
fn street_end(tokens: &[Token], start: usize, end: usize) -> Option<usize> {
    let extend_unit = |mut at: usize| {
        if at < end && tokens[at].unit_label().is_some() {
            at += 1;
            if at < end {
                at += 1;
            }
        }
        at
    };

    if let Some(after_box) = starts_po_box(tokens, start, end) {
        let at = if after_box < end { after_box + 1 } else { after_box };
        return Some(extend_unit(at));
    }

    let name_start = if tokens[start].starts_with_digit() { start + 1 } else { start };
    let type_at = (name_start + 1..end).find(|&at| tokens[at].is_street_type());
    if let Some(type_at) = type_at {
        let mut at = type_at + 1;
        if at < end && tokens[at].is_directional() && at + 1 < end {
            at += 1;
        }
        return Some(extend_unit(at));
    }

    let unit_at = (name_start..end).find(|&at| tokens[at].unit_label().is_some())?;
    Some(extend_unit(unit_at))
}

/// Index right after a PO box designator at `start`.
fn starts_po_box(tokens: &[Token], start: usize, end: usize) -> Option<usize> {
    PO_BOX_FORMS.iter().find_map(|form| {
        let stop = start + form.len();
        (stop <= end
            && tokens[start..stop]
                .iter()
                .zip(form.iter())
                .all(|(token, word)| token.key == *word))
        .then_some(stop)
    })
}

fn label_street(tokens: &[Token], start: usize, end: usize, labels: &mut Labels) {
    if start >= end {
        return;
    }

    let mut at = start;
    if let Some(after_box) = starts_po_box(tokens, start, end) {
        labels[start..after_box].fill(Some("USPSBoxType"));
        if after_box < end {
            labels[after_box] = Some("USPSBoxID");
            at = after_box + 1;
        } else {
            at = after_box;
        }
        label_unit(tokens, at, end, labels);
        return;
    }

    let has_number = tokens[at].starts_with_digit();
    if has_number {
        labels[at] = Some("AddressNumber");
        at += 1;
    }
    let unit_at = (at..end).find(|&index| tokens[index].unit_label().is_some());
    let core_end = unit_at.unwrap_or(end);
    let has_type = (at..core_end).any(|index| tokens[index].is_street_type());
    if !has_number && !has_type && unit_at.is_none() {
        // Nothing marks these words as a street line.
        return;
    }

    label_core(tokens, at, core_end, labels);
    if let Some(unit_at) = unit_at {
        label_unit(tokens, unit_at, end, labels);
    }
}

fn label_core(tokens: &[Token], start: usize, end: usize, labels: &mut Labels) {
    let (mut lo, mut hi) = (start, end);
    if hi.saturating_sub(lo) >= 2 && tokens[lo].is_directional() {
        labels[lo] = Some("StreetNamePreDirectional");
        lo += 1;
    }
    let mut pre_typed = false;
    if hi.saturating_sub(lo) >= 2
        && PRE_TYPES.contains(&tokens[lo].key.as_str())
        && (tokens[lo + 1].starts_with_digit() || tokens[lo + 1].key.len() == 1)
    {
        labels[lo] = Some("StreetNamePreType");
        lo += 1;
        pre_typed = true;
    }
    if hi.saturating_sub(lo) >= 2 && tokens[hi - 1].is_directional() {
        labels[hi - 1] = Some("StreetNamePostDirectional");
        hi -= 1;
    }
    if !pre_typed && hi.saturating_sub(lo) >= 2 && tokens[hi - 1].is_street_type() {
        labels[hi - 1] = Some("StreetNamePostType");
        hi -= 1;
    }
    if lo < hi {
        labels[lo..hi].fill(Some("StreetName"));
    }
}

fn label_unit(tokens: &[Token], start: usize, end: usize, labels: &mut Labels) {
    if start >= end {
        return;
    }
    let Some((type_label, id_label)) = tokens[start].unit_label() else {
        return;
    };
    labels[start] = Some(type_label);
    if start + 1 < end {
        labels[start + 1] = Some(id_label);
    }
}

fn join_keys(tokens: &[Token]) -> String {
    tokens
        .iter()
        .map(|token| token.key.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}
