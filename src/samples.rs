use crate::domain::AnalysisMode;

const NER_SAMPLES: &[&str] = &[
    "APT28, also known as Fancy Bear, used phishing to exploit CVE-2023-12345.",
    "The ransomware Conti targeted healthcare using Microsoft Exchange vulnerabilities.",
    "Attackers exploited CVE-2021-44228 (Log4Shell) to gain network access.",
];

const MLM_SAMPLES: &[&str] = &[
    "The attacker used a [MASK] exploit to gain access.",
    "APT28 deployed [MASK] to steal credentials.",
    "The vulnerability allows remote [MASK] execution.",
    "... suggesting a [MASK] in the middle attack.",
];

/// Ready-made inputs for each mode.
pub fn samples(mode: AnalysisMode) -> &'static [&'static str] {
    match mode {
        AnalysisMode::Ner => NER_SAMPLES,
        AnalysisMode::Mlm => MLM_SAMPLES,
    }
}

/// 1-based lookup, matching how samples are listed to users.
pub fn sample(mode: AnalysisMode, number: usize) -> Option<&'static str> {
    number
        .checked_sub(1)
        .and_then(|idx| samples(mode).get(idx).copied())
}
