use std::collections::{HashMap, HashSet};

use crate::models::{FoodEntry, SymptomEntry, SymptomType};

use super::day::day_id;
use super::types::FoodTrigger;

/// Pairs below either threshold are noise.
pub const MIN_CORRELATION: f64 = 0.4;
pub const MIN_OCCURRENCES: u32 = 2;

/// Correlates every logged food with symptoms on the same or the next day.
///
/// For each distinct lower-cased food name with logged day set `D`, every day
/// `d` in `D` on which a symptom type appears in bucket `d` or `d + 1` counts
/// one occurrence for that (food, symptom type) pair. Correlation is
/// occurrences / |D|, so it stays within [0, 1]. Result is filtered by
/// [`MIN_CORRELATION`] and [`MIN_OCCURRENCES`] and stably sorted by
/// correlation, highest first.
pub fn analyze_food_triggers(food: &[FoodEntry], symptoms: &[SymptomEntry]) -> Vec<FoodTrigger> {
    let symptoms_by_day = bucket_symptom_types(symptoms);
    let foods = collect_food_days(food);

    // (food index, symptom) -> slot in `pairs`; `pairs` keeps discovery order.
    let mut slots: HashMap<(usize, SymptomType), usize> = HashMap::new();
    let mut pairs: Vec<(usize, SymptomType, u32)> = Vec::new();

    for (food_idx, logged) in foods.iter().enumerate() {
        for &day in &logged.days {
            let mut seen_today: HashSet<SymptomType> = HashSet::new();
            let window = [day, day + 1];
            for symptom_type in window
                .iter()
                .filter_map(|d| symptoms_by_day.get(d))
                .flatten()
            {
                if !seen_today.insert(*symptom_type) {
                    continue;
                }
                let slot = *slots.entry((food_idx, *symptom_type)).or_insert_with(|| {
                    pairs.push((food_idx, *symptom_type, 0));
                    pairs.len() - 1
                });
                pairs[slot].2 += 1;
            }
        }
    }

    let mut triggers: Vec<FoodTrigger> = pairs
        .into_iter()
        .map(|(food_idx, symptom_type, occurrences)| {
            let logged = &foods[food_idx];
            FoodTrigger {
                food_name: logged.name.clone(),
                symptom_type,
                correlation: f64::from(occurrences) / logged.days.len() as f64,
                occurrences,
            }
        })
        .filter(|t| t.correlation >= MIN_CORRELATION && t.occurrences >= MIN_OCCURRENCES)
        .collect();

    // sort_by is stable: equal correlations keep discovery order.
    triggers.sort_by(|a, b| b.correlation.total_cmp(&a.correlation));

    tracing::debug!(
        foods = foods.len(),
        candidate_pairs = slots.len(),
        triggers = triggers.len(),
        "Food trigger analysis complete"
    );

    triggers
}

/// A distinct food name and the distinct days it was logged on.
struct LoggedFood {
    name: String,
    days: Vec<i64>,
}

/// Foods in first-appearance order, days in first-appearance order.
fn collect_food_days(food: &[FoodEntry]) -> Vec<LoggedFood> {
    let mut foods: Vec<LoggedFood> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut seen: HashSet<(usize, i64)> = HashSet::new();

    for entry in food {
        let day = day_id(entry.timestamp);
        let name = entry.normalized_name();
        let idx = match index.get(&name) {
            Some(&idx) => idx,
            None => {
                foods.push(LoggedFood {
                    name: name.clone(),
                    days: Vec::new(),
                });
                index.insert(name, foods.len() - 1);
                foods.len() - 1
            }
        };
        if seen.insert((idx, day)) {
            foods[idx].days.push(day);
        }
    }

    foods
}

fn bucket_symptom_types(symptoms: &[SymptomEntry]) -> HashMap<i64, Vec<SymptomType>> {
    let mut by_day: HashMap<i64, Vec<SymptomType>> = HashMap::new();
    for symptom in symptoms {
        let day = day_id(symptom.timestamp);
        by_day.entry(day).or_default().push(symptom.symptom_type);
    }
    by_day
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::insights::day::DAY_MS;
    use crate::models::{MealCategory, SymptomSeverity};

    const NOON: i64 = 12 * 3_600_000;

    fn food(name: &str, day: i64) -> FoodEntry {
        FoodEntry::new(name, MealCategory::Lunch, day * DAY_MS + NOON)
    }

    fn symptom(kind: SymptomType, day: i64) -> SymptomEntry {
        SymptomEntry::new(kind, SymptomSeverity::Mild, day * DAY_MS + NOON)
    }

    fn find<'a>(triggers: &'a [FoodTrigger], name: &str, kind: SymptomType) -> Option<&'a FoodTrigger> {
        triggers
            .iter()
            .find(|t| t.food_name == name && t.symptom_type == kind)
    }

    #[test]
    fn egg_same_day_and_next_day_nausea() {
        let foods = vec![food("egg", 1), food("egg", 3)];
        let symptoms = vec![symptom(SymptomType::Nausea, 1), symptom(SymptomType::Nausea, 4)];

        let triggers = analyze_food_triggers(&foods, &symptoms);
        let egg = find(&triggers, "egg", SymptomType::Nausea).expect("egg → nausea");
        assert_eq!(egg.occurrences, 2);
        assert_eq!(egg.correlation, 1.0);
    }

    #[test]
    fn food_names_match_case_insensitively() {
        let foods = vec![food("Egg", 1), food("EGG", 3)];
        let symptoms = vec![symptom(SymptomType::Nausea, 1), symptom(SymptomType::Nausea, 3)];

        let triggers = analyze_food_triggers(&foods, &symptoms);
        assert_eq!(triggers.len(), 1);
        assert_eq!(triggers[0].food_name, "egg");
    }

    #[test]
    fn symptom_two_days_later_does_not_count() {
        let foods = vec![food("milk", 1), food("milk", 5)];
        let symptoms = vec![symptom(SymptomType::Heartburn, 3), symptom(SymptomType::Heartburn, 7)];

        assert!(analyze_food_triggers(&foods, &symptoms).is_empty());
    }

    #[test]
    fn symptom_the_day_before_does_not_count() {
        let foods = vec![food("milk", 2), food("milk", 6)];
        let symptoms = vec![symptom(SymptomType::Heartburn, 1), symptom(SymptomType::Heartburn, 5)];

        assert!(analyze_food_triggers(&foods, &symptoms).is_empty());
    }

    #[test]
    fn single_occurrence_is_filtered_out() {
        let foods = vec![food("fish", 1)];
        let symptoms = vec![symptom(SymptomType::Dizziness, 1)];

        assert!(analyze_food_triggers(&foods, &symptoms).is_empty());
    }

    #[test]
    fn low_correlation_is_filtered_out() {
        // Logged on 6 days, symptom after 2 of them: 0.33 < 0.4.
        let foods: Vec<FoodEntry> = (0..6).map(|i| food("rice", i * 10)).collect();
        let symptoms = vec![symptom(SymptomType::Fatigue, 0), symptom(SymptomType::Fatigue, 10)];

        assert!(analyze_food_triggers(&foods, &symptoms).is_empty());
    }

    #[test]
    fn threshold_correlation_is_kept() {
        // 2 of 5 days = 0.4 exactly.
        let foods: Vec<FoodEntry> = (0..5).map(|i| food("rice", i * 10)).collect();
        let symptoms = vec![symptom(SymptomType::Fatigue, 0), symptom(SymptomType::Fatigue, 10)];

        let triggers = analyze_food_triggers(&foods, &symptoms);
        assert_eq!(triggers.len(), 1);
        assert_eq!(triggers[0].correlation, 0.4);
    }

    #[test]
    fn denominator_is_distinct_days_not_log_count() {
        // Three logs on day 1, two on day 3: two distinct days.
        let foods = vec![
            food("tea", 1),
            food("tea", 1),
            food("tea", 1),
            food("tea", 3),
            food("tea", 3),
        ];
        let symptoms = vec![symptom(SymptomType::Headache, 1), symptom(SymptomType::Headache, 3)];

        let triggers = analyze_food_triggers(&foods, &symptoms);
        let tea = find(&triggers, "tea", SymptomType::Headache).unwrap();
        assert_eq!(tea.occurrences, 2);
        assert_eq!(tea.correlation, 1.0);
    }

    #[test]
    fn repeated_symptoms_on_one_food_day_count_once() {
        let foods = vec![food("coffee", 1), food("coffee", 2)];
        let symptoms = vec![
            symptom(SymptomType::Nausea, 1),
            symptom(SymptomType::Nausea, 1),
            symptom(SymptomType::Nausea, 2),
            symptom(SymptomType::Nausea, 3),
        ];

        let triggers = analyze_food_triggers(&foods, &symptoms);
        let coffee = find(&triggers, "coffee", SymptomType::Nausea).unwrap();
        assert_eq!(coffee.occurrences, 2);
        assert!(coffee.correlation <= 1.0);
    }

    #[test]
    fn each_symptom_type_is_tracked_separately() {
        let foods = vec![food("beans", 1), food("beans", 4)];
        let symptoms = vec![
            symptom(SymptomType::StomachPain, 1),
            symptom(SymptomType::StomachPain, 5),
            symptom(SymptomType::Diarrhea, 2),
        ];

        let triggers = analyze_food_triggers(&foods, &symptoms);
        assert!(find(&triggers, "beans", SymptomType::StomachPain).is_some());
        assert!(find(&triggers, "beans", SymptomType::Diarrhea).is_none());
    }

    #[test]
    fn sorted_by_correlation_descending_with_stable_ties() {
        let foods = vec![
            // apple: 2 of 4 days -> 0.5
            food("apple", 10),
            food("apple", 20),
            food("apple", 30),
            food("apple", 40),
            // bread: 2 of 2 days -> 1.0
            food("bread", 50),
            food("bread", 60),
            // cheese: 2 of 2 days -> 1.0, discovered after bread
            food("cheese", 70),
            food("cheese", 80),
        ];
        let symptoms = vec![
            symptom(SymptomType::Nausea, 10),
            symptom(SymptomType::Nausea, 20),
            symptom(SymptomType::Nausea, 50),
            symptom(SymptomType::Nausea, 60),
            symptom(SymptomType::Nausea, 70),
            symptom(SymptomType::Nausea, 80),
        ];

        let triggers = analyze_food_triggers(&foods, &symptoms);
        let names: Vec<&str> = triggers.iter().map(|t| t.food_name.as_str()).collect();
        assert_eq!(names, vec!["bread", "cheese", "apple"]);
    }

    #[test]
    fn never_logged_food_produces_nothing() {
        let foods = vec![food("egg", 1), food("egg", 2)];
        let symptoms = vec![symptom(SymptomType::Nausea, 1), symptom(SymptomType::Nausea, 2)];

        let triggers = analyze_food_triggers(&foods, &symptoms);
        assert!(triggers.iter().all(|t| t.food_name == "egg"));
    }

    #[test]
    fn buckets_are_utc_days_not_local_days() {
        // A 23:30 UTC meal and a 00:30 UTC symptom land in adjacent buckets.
        let late = FoodEntry::new("soup", MealCategory::Dinner, 10 * DAY_MS + 23 * 3_600_000 + 1_800_000);
        let late2 = FoodEntry::new("soup", MealCategory::Dinner, 20 * DAY_MS + 23 * 3_600_000 + 1_800_000);
        let next_morning = SymptomEntry::new(SymptomType::Heartburn, SymptomSeverity::Mild, 11 * DAY_MS + 1_800_000);
        let next_morning2 = SymptomEntry::new(SymptomType::Heartburn, SymptomSeverity::Mild, 21 * DAY_MS + 1_800_000);

        let triggers = analyze_food_triggers(&[late, late2], &[next_morning, next_morning2]);
        assert_eq!(triggers.len(), 1);
        assert_eq!(triggers[0].occurrences, 2);
    }

    #[test]
    fn empty_history_yields_empty_list() {
        assert!(analyze_food_triggers(&[], &[]).is_empty());
        assert!(analyze_food_triggers(&[food("egg", 1)], &[]).is_empty());
    }

    #[test]
    fn pre_epoch_record_does_not_hide_other_triggers() {
        let mut foods = vec![food("egg", 1), food("egg", 3)];
        foods.push(FoodEntry::new("tea", MealCategory::Snack, -1));
        let symptoms = vec![symptom(SymptomType::Nausea, 1), symptom(SymptomType::Nausea, 4)];

        let triggers = analyze_food_triggers(&foods, &symptoms);
        let egg = find(&triggers, "egg", SymptomType::Nausea).expect("egg trigger kept");
        assert_eq!(egg.occurrences, 2);
        assert_eq!(egg.correlation, 1.0);
    }

    #[test]
    fn pre_epoch_records_bucket_by_floor() {
        // -1 ms is day -1, so a symptom at epoch 0 is the next day.
        let foods = vec![
            FoodEntry::new("tea", MealCategory::Snack, -1),
            FoodEntry::new("tea", MealCategory::Snack, -DAY_MS - 1),
        ];
        let symptoms = vec![
            SymptomEntry::new(SymptomType::Headache, SymptomSeverity::Mild, 0),
            SymptomEntry::new(SymptomType::Headache, SymptomSeverity::Mild, -DAY_MS),
        ];

        let triggers = analyze_food_triggers(&foods, &symptoms);
        let tea = find(&triggers, "tea", SymptomType::Headache).unwrap();
        assert_eq!(tea.occurrences, 2);
        assert_eq!(tea.correlation, 1.0);
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        const FOODS: &[&str] = &["egg", "Milk", "rice", "EGG", "tea"];

        fn history() -> impl Strategy<Value = (Vec<FoodEntry>, Vec<SymptomEntry>)> {
            let food_entry = (0..FOODS.len(), 0i64..20, 0i64..DAY_MS)
                .prop_map(|(i, day, offset)| {
                    FoodEntry::new(FOODS[i], MealCategory::Snack, day * DAY_MS + offset)
                });
            let symptom_entry = (0..SymptomType::ALL.len(), 0i64..21, 0i64..DAY_MS)
                .prop_map(|(i, day, offset)| {
                    SymptomEntry::new(SymptomType::ALL[i], SymptomSeverity::Mild, day * DAY_MS + offset)
                });
            (
                prop::collection::vec(food_entry, 0..40),
                prop::collection::vec(symptom_entry, 0..60),
            )
        }

        proptest! {
            #[test]
            fn every_trigger_passes_the_filter((foods, symptoms) in history()) {
                for t in analyze_food_triggers(&foods, &symptoms) {
                    prop_assert!(t.correlation >= MIN_CORRELATION);
                    prop_assert!(t.correlation <= 1.0);
                    prop_assert!(t.occurrences >= MIN_OCCURRENCES);
                }
            }

            #[test]
            fn result_is_sorted_descending((foods, symptoms) in history()) {
                let triggers = analyze_food_triggers(&foods, &symptoms);
                for pair in triggers.windows(2) {
                    prop_assert!(pair[0].correlation >= pair[1].correlation);
                }
            }

            #[test]
            fn triggers_only_name_logged_foods((foods, symptoms) in history()) {
                let logged: HashSet<String> = foods.iter().map(|f| f.normalized_name()).collect();
                for t in analyze_food_triggers(&foods, &symptoms) {
                    prop_assert!(logged.contains(&t.food_name));
                }
            }

            #[test]
            fn input_order_of_symptoms_does_not_change_pairs((foods, symptoms) in history()) {
                let forward = analyze_food_triggers(&foods, &symptoms);
                let mut reversed_symptoms = symptoms.clone();
                reversed_symptoms.reverse();
                let backward = analyze_food_triggers(&foods, &reversed_symptoms);

                let key = |t: &FoodTrigger| (t.food_name.clone(), t.symptom_type.as_str(), t.occurrences);
                let mut a: Vec<_> = forward.iter().map(key).collect();
                let mut b: Vec<_> = backward.iter().map(key).collect();
                a.sort();
                b.sort();
                prop_assert_eq!(a, b);
            }
        }
    }
}
