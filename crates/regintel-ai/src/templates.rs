//! Built-in narrative rules for known litigation families and regulations.
//!
//! Order matters: the first matching rule wins, so the specific litigation
//! families come before the broader regulatory topics.

use regintel_core::DocumentKind;

use crate::summary::{Condition, RiskBadge, SummaryRule, Template};

struct BuiltinRule {
    name: &'static str,
    kinds: &'static [DocumentKind],
    all_of: &'static [&'static [&'static str]],
    summary: &'static str,
    key_points: &'static [&'static str],
    risk: RiskBadge,
    action_required: bool,
}

const ANY: &[DocumentKind] = &[];
const LEGAL: &[DocumentKind] = &[DocumentKind::Legal];
const REGULATORY: &[DocumentKind] = &[DocumentKind::Regulatory];

const RULES: &[BuiltinRule] = &[
    BuiltinRule {
        name: "philips-cpap-recall",
        kinds: ANY,
        all_of: &[
            &["philips"],
            &["cpap", "bipap", "sleep apnea", "dreamstation", "respironics", "ventilator"],
        ],
        summary: "Philips Respironics recalled millions of CPAP, BiPAP and mechanical ventilator \
                  devices after polyester-based polyurethane sound abatement foam was found to \
                  degrade and release particles and volatile compounds. The recall triggered \
                  consolidated federal litigation and a consent decree restricting new device sales.",
        key_points: &[
            "Philips CPAP and BiPAP recall covers DreamStation and related devices with degrading PE-PUR foam",
            "Consolidated MDL in the Western District of Pennsylvania covers personal injury, economic loss and medical monitoring claims",
            "Economic loss and personal injury settlements together exceed $1.5 billion",
            "Consent decree bars sale of new sleep and respiratory devices in the US until compliance conditions are met",
            "Manufacturers of respiratory devices should review foam and material biocompatibility data",
        ],
        risk: RiskBadge::Urgent,
        action_required: true,
    },
    BuiltinRule {
        name: "insulin-pump-recall",
        kinds: ANY,
        all_of: &[&["insulin pump", "minimed"], &["recall", "cybersecurity", "vulnerabilit"]],
        summary: "Insulin pump recalls and safety communications have addressed retainer ring \
                  defects, battery failures and wireless vulnerabilities that can cause over- or \
                  under-delivery of insulin.",
        key_points: &[
            "Insulin pump recalls are typically classified as Class I because dosing errors can be life-threatening",
            "Wireless communication vulnerabilities have prompted pump replacement programs",
            "Patients and clinics must be notified and devices inspected or replaced",
        ],
        risk: RiskBadge::High,
        action_required: true,
    },
    BuiltinRule {
        name: "exactech-implant-litigation",
        kinds: LEGAL,
        all_of: &[&["exactech"]],
        summary: "Exactech faces consolidated litigation over knee, hip and ankle implants packaged \
                  in non-conforming vacuum bags that allowed oxidation of polyethylene inserts, \
                  leading to early wear and revision surgery.",
        key_points: &[
            "Exactech recalled polyethylene inserts packaged without an adequate oxygen barrier",
            "Claims allege accelerated wear, osteolysis and revision surgery",
            "Exactech filed for Chapter 11 protection in 2024, affecting claim recovery",
        ],
        risk: RiskBadge::High,
        action_required: false,
    },
    BuiltinRule {
        name: "hernia-mesh-litigation",
        kinds: LEGAL,
        all_of: &[&["hernia"], &["mesh"]],
        summary: "Hernia mesh product liability litigation alleges that polypropylene and coated \
                  mesh implants caused adhesions, infection, migration and revision surgery. \
                  Thousands of claims are consolidated against major mesh manufacturers.",
        key_points: &[
            "Bard/Davol and Ethicon hernia mesh claims are consolidated in multidistrict litigation",
            "Allegations focus on design defect and failure to warn",
            "Bellwether verdicts inform settlement values for remaining claims",
        ],
        risk: RiskBadge::High,
        action_required: false,
    },
    BuiltinRule {
        name: "metal-on-metal-hip-litigation",
        kinds: LEGAL,
        all_of: &[&["metal-on-metal", "hip implant", "hip replacement"]],
        summary: "Metal-on-metal hip implant litigation concerns elevated cobalt and chromium ion \
                  levels, tissue reactions and early revision of hip replacement components.",
        key_points: &[
            "Claims cite metallosis, pseudotumors and early revision surgery",
            "Regulators now require ongoing monitoring of patients with metal-on-metal hips",
            "Most large settlements have closed, but individual claims continue",
        ],
        risk: RiskBadge::Medium,
        action_required: false,
    },
    BuiltinRule {
        name: "eu-mdr-transition",
        kinds: REGULATORY,
        all_of: &[&["eu mdr", "2017/745", "medical device regulation"]],
        summary: "The EU Medical Device Regulation (EU) 2017/745 replaces the MDD and AIMDD. \
                  Extended transition periods depend on manufacturers having applied to a notified \
                  body and maintaining a compliant quality management system.",
        key_points: &[
            "Legacy Class III and implantable Class IIb devices must transition by 31 December 2027",
            "Other legacy Class IIb, IIa and Class I sterile/measuring devices have until 31 December 2028",
            "A formal notified body application and signed agreement are prerequisites for the extension",
            "EUDAMED modules become mandatory in stages once declared functional",
        ],
        risk: RiskBadge::High,
        action_required: true,
    },
    BuiltinRule {
        name: "eu-ivdr-transition",
        kinds: REGULATORY,
        all_of: &[&["ivdr", "2017/746", "in vitro diagnostic regulation"]],
        summary: "The EU In Vitro Diagnostic Regulation (EU) 2017/746 brings most IVDs under \
                  notified body oversight for the first time, with staggered transition deadlines \
                  by risk class.",
        key_points: &[
            "Class D devices transition first, followed by Class C and Class B/A sterile devices",
            "Performance evaluation and post-market performance follow-up plans are required",
            "Notified body capacity remains a bottleneck for certification",
        ],
        risk: RiskBadge::High,
        action_required: true,
    },
    BuiltinRule {
        name: "fda-cybersecurity-premarket",
        kinds: REGULATORY,
        all_of: &[&["cybersecurity"], &["premarket", "524b", "cyber device", "fda"]],
        summary: "FDA requires premarket submissions for cyber devices to include cybersecurity \
                  information under section 524B of the FD&C Act, including a software bill of \
                  materials and a plan to monitor and address vulnerabilities.",
        key_points: &[
            "Submissions lacking required cybersecurity information can be refused",
            "A software bill of materials (SBOM) is mandatory for cyber devices",
            "Manufacturers must maintain processes for coordinated vulnerability disclosure and patching",
        ],
        risk: RiskBadge::High,
        action_required: true,
    },
    BuiltinRule {
        name: "ai-enabled-device-guidance",
        kinds: REGULATORY,
        all_of: &[&[
            "artificial intelligence",
            "machine learning",
            "ai-enabled",
            "predetermined change control",
        ]],
        summary: "Guidance on AI-enabled device software functions addresses lifecycle management, \
                  predetermined change control plans and transparency for machine learning models.",
        key_points: &[
            "Predetermined change control plans allow pre-authorized model updates",
            "Submissions should describe training data, performance testing and bias mitigation",
            "Labeling should explain model inputs, outputs and limitations to users",
        ],
        risk: RiskBadge::Medium,
        action_required: false,
    },
    BuiltinRule {
        name: "qmsr-iso-13485",
        kinds: REGULATORY,
        all_of: &[&["qmsr", "iso 13485", "quality management system regulation"]],
        summary: "The FDA Quality Management System Regulation incorporates ISO 13485:2016 by \
                  reference, replacing most of the Quality System Regulation in 21 CFR Part 820.",
        key_points: &[
            "QMSR takes effect on 2 February 2026",
            "Design controls, CAPA and supplier controls map onto ISO 13485 clauses",
            "FDA inspections will follow the revised approach once the rule is effective",
        ],
        risk: RiskBadge::Medium,
        action_required: true,
    },
    BuiltinRule {
        name: "ukca-marking",
        kinds: REGULATORY,
        all_of: &[&["ukca", "mhra"]],
        summary: "The UK is phasing in a new medical device framework under the MHRA, with \
                  continued acceptance of CE marked devices on the Great Britain market for a \
                  transition period.",
        key_points: &[
            "CE marked devices remain acceptable in Great Britain during the transition period",
            "Post-market surveillance requirements apply ahead of the wider framework",
            "A UK Responsible Person is required for manufacturers based outside the UK",
        ],
        risk: RiskBadge::Medium,
        action_required: false,
    },
];

/// Owned copies of the built-in rules, in priority order.
pub(crate) fn builtin_rules() -> Vec<SummaryRule> {
    RULES
        .iter()
        .map(|r| SummaryRule {
            name: r.name.to_string(),
            kinds: r.kinds.to_vec(),
            condition: Condition {
                all_of: r
                    .all_of
                    .iter()
                    .map(|group| group.iter().map(|k| k.to_string()).collect())
                    .collect(),
            },
            template: Template {
                summary: r.summary.to_string(),
                key_points: r.key_points.iter().map(|p| p.to_string()).collect(),
                risk_level: r.risk,
                action_required: r.action_required,
            },
        })
        .collect()
}
