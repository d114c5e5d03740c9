//! Logistic stroke and coronary heart disease models and their combination.
//!
//! Both models are stratified on sex: one coefficient set for women and one for
//! everyone else. Each returns a percentage rounded half-up to one decimal.
//! The combined risk is the probability of at least one of the two events,
//! treating them as statistically independent. That independence is a
//! modelling simplification; the two events are correlated in reality.

use std::fmt;

use medi_data::{round_one_decimal, Gender};
use serde::Serialize;

use crate::profile::PatientProfile;

const BAR_WIDTH: usize = 40;

/// Coefficient set selected by gender.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskBranch {
    Female,
    NotFemale,
}

impl From<Gender> for RiskBranch {
    fn from(gender: Gender) -> Self {
        match gender {
            Gender::Female => RiskBranch::Female,
            Gender::Male | Gender::Other | Gender::Unknown => RiskBranch::NotFemale,
        }
    }
}

/// Coronary, stroke and combined risk in percent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RiskResult {
    coronary: f64,
    stroke: f64,
    combined: f64,
}

impl RiskResult {
    pub fn coronary(&self) -> f64 {
        self.coronary
    }

    pub fn stroke(&self) -> f64 {
        self.stroke
    }

    pub fn combined(&self) -> f64 {
        self.combined
    }

    /// One labelled bar per risk, scaled to 0-100 %.
    pub fn render_bars(&self) -> String {
        [
            ("Heart attack", self.coronary),
            ("Stroke", self.stroke),
            ("Both", self.combined),
        ]
        .iter()
        .map(|(label, pct)| {
            let filled = ((pct / 100.0) * BAR_WIDTH as f64).round() as usize;
            let filled = filled.min(BAR_WIDTH);
            format!(
                "{label:<13}|{}{}| {pct:>5.1} %\n",
                "#".repeat(filled),
                " ".repeat(BAR_WIDTH - filled)
            )
        })
        .collect()
    }
}

impl fmt::Display for RiskResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "The risk of heart attack is {:.1} %, the risk of stroke is {:.1} %, and the combined risk is {:.1} %",
            self.coronary, self.stroke, self.combined
        )
    }
}

/// 1 / (1 + e^x); the models are written with the sign folded into the linear term.
fn logistic_complement(x: f64) -> f64 {
    1.0 / (1.0 + x.exp())
}

fn indicator(flag: bool) -> f64 {
    if flag {
        1.0
    } else {
        0.0
    }
}

fn to_percentage(probability: f64) -> f64 {
    round_one_decimal(probability * 100.0).clamp(0.0, 100.0)
}

pub fn stroke_risk(profile: &PatientProfile) -> f64 {
    let age = f64::from(profile.age());
    let smoke = indicator(profile.smoker());
    let db = indicator(profile.diabetic());
    let hdl = profile.hdl();
    let bp = profile.systolic_bp();

    let risk = match RiskBranch::from(profile.gender()) {
        RiskBranch::Female => logistic_complement(
            9.553 - 0.085 * age - 0.613 * smoke + 0.623 * hdl - 0.012 * bp - 0.914 * db,
        ),
        RiskBranch::NotFemale => logistic_complement(
            9.928 - 0.083 * age - 0.369 * smoke + 0.329 * hdl - 0.014 * bp - 0.705 * db,
        ),
    };
    to_percentage(risk)
}

pub fn coronary_risk(profile: &PatientProfile) -> f64 {
    let age = f64::from(profile.age());
    let smoke = indicator(profile.smoker());
    let db = indicator(profile.diabetic());
    let ch = profile.total_cholesterol();
    let hdl = profile.hdl();
    let bp = profile.systolic_bp();

    let risk = match RiskBranch::from(profile.gender()) {
        RiskBranch::Female => logistic_complement(
            11.250 - 0.095 * age - 0.639 * smoke - 0.244 * ch + 0.845 * hdl
                - 0.013 * bp
                - 1.315 * db,
        ),
        // The lone +0.329 is a separate constant, not part of the cholesterol term.
        RiskBranch::NotFemale => logistic_complement(
            9.081 - 0.075 * age - 0.579 * smoke + 0.329 - 0.320 * ch + 1.082 * hdl
                - 0.011 * bp
                - 0.729 * db,
        ),
    };
    to_percentage(risk)
}

/// Probability of at least one event, from two percentages.
pub fn combined_risk(coronary_pct: f64, stroke_pct: f64) -> f64 {
    let risk = 1.0 - (1.0 - coronary_pct / 100.0) * (1.0 - stroke_pct / 100.0);
    to_percentage(risk)
}

pub fn compute_risk(profile: &PatientProfile) -> RiskResult {
    let coronary = coronary_risk(profile);
    let stroke = stroke_risk(profile);
    let combined = combined_risk(coronary, stroke);
    log::debug!(
        "patient {}: coronary {coronary} %, stroke {stroke} %, combined {combined} %",
        profile.id()
    );
    RiskResult {
        coronary,
        stroke,
        combined,
    }
}
