//! Chart series preparation. Only the numbers are produced here; drawing
//! them is left to whatever renders the view.
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::models::{ActivityLevel, ConsumableQuantity, HealthRecord, Meal};

/// NutritionSplit
///
/// Macronutrient totals in grams, the data behind the pie chart.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct NutritionSplit {
    pub glucides: f64,
    pub lipides: f64,
    pub proteines: f64,
}

/// DailyIntake
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DailyIntake {
    pub date: NaiveDate,
    pub calories: f64,
    pub hydratation: f64,
}

/// ActivityShare
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ActivityShare {
    pub level: ActivityLevel,
    pub label: &'static str,
    pub count: usize,
}

/// HealthSummary
///
/// Averages over a patient's measurements, rounded to two decimals.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HealthSummary {
    pub poids_moyen: f64,
    pub imc_moyen: f64,
    pub taille_moyenne: f64,
    pub tour_de_taille_moyen: f64,
    pub activite_repartition: Vec<ActivityShare>,
}

/// Sums the backend-computed meal totals. Missing totals count as zero.
pub fn nutrition_split(meals: &[Meal]) -> NutritionSplit {
    meals.iter().fold(NutritionSplit::default(), |acc, meal| NutritionSplit {
        glucides: acc.glucides + meal.total_glucides.unwrap_or(0.0),
        lipides: acc.lipides + meal.total_lipides.unwrap_or(0.0),
        proteines: acc.proteines + meal.total_proteines.unwrap_or(0.0),
    })
}

/// Macronutrients of one meal computed from its consumable lines. Catalog
/// values are per 100 g/ml.
pub fn nutrition_from_lines(lines: &[ConsumableQuantity]) -> NutritionSplit {
    lines.iter().fold(NutritionSplit::default(), |acc, line| {
        let factor = f64::from(line.quantite) / 100.0;
        NutritionSplit {
            glucides: acc.glucides + line.consumable.glucides * factor,
            lipides: acc.lipides + line.consumable.lipides * factor,
            proteines: acc.proteines + line.consumable.proteines * factor,
        }
    })
}

/// Calories and hydration per calendar day, oldest first. The day is the
/// one written in the meal's own timestamp offset.
pub fn daily_intake(meals: &[Meal]) -> Vec<DailyIntake> {
    let mut by_day: BTreeMap<NaiveDate, (f64, f64)> = BTreeMap::new();
    for meal in meals {
        let entry = by_day.entry(meal.date_consommation.date_naive()).or_default();
        entry.0 += meal.total_calories.unwrap_or(0.0);
        entry.1 += meal.total_hydratation.unwrap_or(0.0);
    }

    by_day
        .into_iter()
        .map(|(date, (calories, hydratation))| DailyIntake {
            date,
            calories,
            hydratation,
        })
        .collect()
}

/// `None` for an empty history: there is nothing to average.
pub fn health_summary(records: &[HealthRecord]) -> Option<HealthSummary> {
    if records.is_empty() {
        return None;
    }

    let n = records.len() as f64;
    let mean = |f: fn(&HealthRecord) -> f64| round2(records.iter().map(f).sum::<f64>() / n);

    let activite_repartition = ActivityLevel::ALL
        .into_iter()
        .map(|level| ActivityShare {
            level,
            label: level.label(),
            count: records
                .iter()
                .filter(|r| r.niveau_activite_physique == Some(level))
                .count(),
        })
        .collect();

    Some(HealthSummary {
        poids_moyen: mean(|r| r.poids),
        imc_moyen: mean(|r| r.imc.unwrap_or(0.0)),
        taille_moyenne: mean(|r| r.taille),
        tour_de_taille_moyen: mean(|r| r.tour_de_taille),
        activite_repartition,
    })
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
