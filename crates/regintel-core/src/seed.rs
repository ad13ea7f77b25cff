//! Synthetic regulatory updates and legal cases for demo datasets.
//!
//! Records are built by round-robin over fixed authority, court, device and
//! topic lists, so output depends only on `(count, start)`. Publication dates
//! step back one day per record from `start`.

use chrono::{Datelike, Days, NaiveDate};
use tracing::debug;

use crate::{Document, DocumentKind, ImpactTier};

/// Issuing authority and its region.
const AUTHORITIES: &[(&str, &str)] = &[
    ("FDA", "US"),
    ("EMA", "EU"),
    ("MHRA", "UK"),
    ("Health Canada", "CA"),
    ("TGA", "AU"),
    ("PMDA", "JP"),
    ("Swissmedic", "CH"),
    ("NMPA", "CN"),
];

/// Court and its region.
const COURTS: &[(&str, &str)] = &[
    ("U.S. District Court for the Western District of Pennsylvania", "US"),
    ("U.S. District Court for the District of New Jersey", "US"),
    ("High Court of Justice (England and Wales)", "UK"),
    ("Ontario Superior Court of Justice", "CA"),
    ("Federal Court of Australia", "AU"),
    ("Landgericht München I", "DE"),
    ("Court of Justice of the European Union", "EU"),
];

const DEVICES: &[&str] = &[
    "implantable cardiac pacemaker",
    "continuous glucose monitor",
    "orthopedic knee implant",
    "diagnostic imaging system",
    "robotic surgical system",
    "insulin pump",
    "cardiovascular stent",
    "wearable fitness tracker",
    "hearing aid",
    "ventilator",
];

/// Regulatory topics: (title template, content template).
///
/// Placeholders: `{authority}`, `{device}`, `{region}`.
const REGULATORY_TOPICS: &[(&str, &str)] = &[
    (
        "{authority} issues draft guidance on {device} cybersecurity",
        "{authority} has published draft guidance describing premarket cybersecurity expectations \
         for the {device}. Manufacturers should provide a software bill of materials, threat model \
         and vulnerability management plan. Comments are accepted for 90 days.",
    ),
    (
        "{authority} announces Class I recall of {device}",
        "{authority} classified the recall of the {device} as Class I, the most serious type. \
         Use of affected units may cause serious injury or death. Distributors in {region} must \
         quarantine remaining stock and notify healthcare providers.",
    ),
    (
        "{authority} updates post-market surveillance requirements for {device}",
        "New post-market surveillance obligations require periodic safety update reports and \
         trend reporting of adverse events for the {device}. Vigilance timelines are shortened \
         for serious incidents.",
    ),
    (
        "{authority} clears {device} through expedited pathway",
        "{authority} granted clearance for a new {device} following review of clinical evidence \
         and substantial equivalence to a predicate. Labeling must reflect the cleared indications.",
    ),
    (
        "{authority} consults on quality management system alignment for {device} makers",
        "The consultation proposes aligning quality system requirements with ISO 13485. \
         Manufacturers of the {device} should review CAPA, design controls and supplier controls \
         ahead of the transition period.",
    ),
    (
        "{authority} publishes guidance on AI-enabled {device}",
        "Guidance covers machine learning model change control plans, data management and \
         performance monitoring for the {device} incorporating artificial intelligence.",
    ),
];

/// Legal case families: (title template, content template, defendant).
///
/// Placeholders: `{court}`, `{device}`, `{defendant}`.
const CASE_FAMILIES: &[(&str, &str, &str)] = &[
    (
        "In re {defendant} CPAP, BiPAP and Mechanical Ventilator Recall Litigation",
        "Plaintiffs allege that sound abatement foam in {defendant} CPAP and BiPAP sleep apnea \
         devices degraded and released toxic particles. The {court} is managing personal injury, \
         economic loss and medical monitoring claims.",
        "Philips Respironics",
    ),
    (
        "Hernia mesh product liability action against {defendant}",
        "Claims allege that polypropylene hernia mesh manufactured by {defendant} caused \
         adhesions, infection and revision surgery. The {court} consolidated pretrial proceedings.",
        "C. R. Bard",
    ),
    (
        "Metal-on-metal hip implant claims against {defendant}",
        "Plaintiffs allege elevated cobalt and chromium levels and early revision of metal-on-metal \
         hip implant components supplied by {defendant}. Bellwether trials are scheduled before the {court}.",
        "DePuy Orthopaedics",
    ),
    (
        "Product liability claims over {device} supplied by {defendant}",
        "The complaint alleges design defect and failure to warn in connection with the {device}. \
         {defendant} denies liability and has moved to dismiss in the {court}.",
        "Medtronic",
    ),
    (
        "Class action over {device} marketing by {defendant}",
        "Consumers allege that {defendant} misrepresented the accuracy of its {device}. \
         The {court} certified a nationwide class for settlement purposes.",
        "Abbott Laboratories",
    ),
];

const IMPACT_CYCLE: &[ImpactTier] = &[
    ImpactTier::High,
    ImpactTier::Medium,
    ImpactTier::Low,
    ImpactTier::Critical,
    ImpactTier::Medium,
];

/// Generate `count` regulatory updates.
pub fn regulatory_updates(count: usize, start: NaiveDate) -> Vec<Document> {
    let docs: Vec<Document> = (0..count).map(|i| regulatory_update(i, start)).collect();
    debug!(count = docs.len(), "generated regulatory updates");
    docs
}

/// Generate `count` legal cases.
pub fn legal_cases(count: usize, start: NaiveDate) -> Vec<Document> {
    let docs: Vec<Document> = (0..count).map(|i| legal_case(i, start)).collect();
    debug!(count = docs.len(), "generated legal cases");
    docs
}

/// Generate `count` records alternating regulatory updates and legal cases.
pub fn mixed(count: usize, start: NaiveDate) -> Vec<Document> {
    let docs: Vec<Document> = (0..count)
        .map(|i| {
            if i % 2 == 0 {
                regulatory_update(i / 2, start)
            } else {
                legal_case(i / 2, start)
            }
        })
        .collect();
    debug!(count = docs.len(), "generated mixed records");
    docs
}

fn regulatory_update(i: usize, start: NaiveDate) -> Document {
    let (authority, region) = AUTHORITIES[i % AUTHORITIES.len()];
    let device = DEVICES[i % DEVICES.len()];
    let (title, content) = REGULATORY_TOPICS[i % REGULATORY_TOPICS.len()];
    let fill = |t: &str| {
        t.replace("{authority}", authority)
            .replace("{device}", device)
            .replace("{region}", region)
    };
    let published_date = date_for(i, start);

    Document {
        id: format!("REG-{:05}", i + 1),
        kind: DocumentKind::Regulatory,
        title: fill(title),
        content: fill(content),
        region: region.to_string(),
        source: authority.to_string(),
        reference: Some(format!(
            "{}-{}-{:04}",
            authority_code(authority),
            published_date.year(),
            i + 1
        )),
        published_date,
        impact: IMPACT_CYCLE[i % IMPACT_CYCLE.len()],
    }
}

fn legal_case(i: usize, start: NaiveDate) -> Document {
    let (court, region) = COURTS[i % COURTS.len()];
    let device = DEVICES[(i + 3) % DEVICES.len()];
    let (title, content, defendant) = CASE_FAMILIES[i % CASE_FAMILIES.len()];
    let fill = |t: &str| {
        t.replace("{court}", court)
            .replace("{device}", device)
            .replace("{defendant}", defendant)
    };
    let published_date = date_for(i, start);

    Document {
        id: format!("LEG-{:05}", i + 1),
        kind: DocumentKind::Legal,
        title: fill(title),
        content: fill(content),
        region: region.to_string(),
        source: court.to_string(),
        reference: Some(format!(
            "{}-cv-{:05}",
            published_date.year() % 100,
            (i * 37 + 1021) % 100_000
        )),
        published_date,
        impact: IMPACT_CYCLE[(i + 1) % IMPACT_CYCLE.len()],
    }
}

fn date_for(i: usize, start: NaiveDate) -> NaiveDate {
    start
        .checked_sub_days(Days::new(i as u64))
        .unwrap_or(NaiveDate::MIN)
}

fn authority_code(authority: &str) -> String {
    let words: Vec<&str> = authority.split_whitespace().collect();
    if words.len() == 1 {
        return authority.to_ascii_uppercase();
    }
    words
        .iter()
        .filter_map(|w| w.chars().next())
        .collect::<String>()
        .to_ascii_uppercase()
}
