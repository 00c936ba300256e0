use std::slice;

use tempfile::TempDir;

use macro_planner_rs::models::{
    DailyLog, Food, MacroBudget, Macros, MealEntry, MealSlot, ObjectiveMode, Person,
};
use macro_planner_rs::planner::{
    format_balanced, format_remaining, log_remaining, solve, SlotSelection,
};
use macro_planner_rs::state::{
    load_household, save_household, Household, HouseholdFile, SupplementIds,
};

fn household() -> Household {
    Household::new(HouseholdFile {
        foods: vec![
            Food::new("eggs", "Eggs", 6.0, 0.5, 5.0).with_serving("1 egg"),
            Food::new("tuna", "Canned Tuna", 25.0, 0.0, 1.0).with_serving("1 can"),
            Food::new("bread", "Rye Bread", 3.0, 15.0, 1.0).with_serving("1 slice"),
            Food::new("salmon", "Salmon Fillet", 20.0, 0.0, 13.0).with_serving("100 g"),
            Food::new("avocado", "Avocado", 2.0, 9.0, 15.0).with_serving("1 avocado"),
            Food::new("oats", "Rolled Oats", 5.0, 27.0, 3.0).with_serving("40 g"),
            Food::new("whey", "Whey Isolate", 25.0, 1.0, 0.5).with_serving("1 scoop"),
            Food::new("mct-oil", "MCT Oil", 0.0, 0.0, 14.0).with_serving("1 tbsp"),
        ],
        people: vec![Person::new("Ana", 140.0, 40.0, 90.0)],
        supplements: Some(SupplementIds {
            protein: "whey".to_string(),
            fat: "mct-oil".to_string(),
        }),
        ..Default::default()
    })
    .unwrap()
}

fn names(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[test]
fn test_finish_dinner_after_logged_meals() {
    let mut household = household();
    let date = "2024-03-05";

    household
        .add_entry("Ana", date, MealSlot::Breakfast, "eggs", 3.0)
        .unwrap();
    household
        .add_entry("ana", date, MealSlot::Lunch, "Canned Tuna", 1.5)
        .unwrap();
    household
        .add_entry("Ana", date, MealSlot::Lunch, "bread", 1.0)
        .unwrap();

    let log = household.find_log("Ana", date).unwrap();
    let remaining = log_remaining(&household, log, MealSlot::Dinner).unwrap();
    let target = remaining.require().unwrap();
    assert!((target.protein - 81.5).abs() < 1e-9);
    assert!((target.carbs - 23.5).abs() < 1e-9);
    assert!((target.fats - 72.5).abs() < 1e-9);

    let fixed = household.fixed_slots(log, MealSlot::Dinner).unwrap();
    assert_eq!(fixed.len(), 2);

    let supplements = household.supplement_pair().unwrap();
    let solved = SlotSelection::new(
        MealSlot::Dinner,
        household.resolve_foods(&names(&["salmon", "avocado"])).unwrap(),
    );
    let settings = household.settings().clone();
    let allocation = solve(
        ObjectiveMode::MinimizeSupplement,
        slice::from_ref(&solved),
        &supplements,
        &remaining,
        &settings,
    )
    .unwrap();

    // Salmon and avocado cover the gap on their own.
    assert!(allocation.supplements.total() < 1e-3);
    assert!((allocation.servings[0][0] - 3.9325).abs() < 1e-2);
    assert!((allocation.servings[0][1] - 1.425).abs() < 1e-2);

    let plan = format_remaining(&fixed, &solved, &supplements, &allocation, &target, &settings);
    let order: Vec<MealSlot> = plan.slots.iter().map(|s| s.slot).collect();
    assert_eq!(
        order,
        vec![MealSlot::Breakfast, MealSlot::Lunch, MealSlot::Dinner]
    );
    assert!(plan.slot(MealSlot::Breakfast).unwrap().fixed);
    assert!(!plan.slot(MealSlot::Dinner).unwrap().fixed);
    assert!(!plan.uses_supplements());
    assert!((plan.daily_total.protein - 140.0).abs() < 1e-2);
    assert!((plan.daily_total.fats - 90.0).abs() < 1e-2);
    assert!(plan.daily_total.carbs <= 40.0 + 1e-2);

    household.record_plan("Ana", date, &plan).unwrap();
    let log = household.find_log("Ana", date).unwrap();
    let dinner: Vec<_> = log.entries_in(MealSlot::Dinner).collect();
    assert_eq!(dinner.len(), 2);
    // Logged meals are left alone.
    assert_eq!(log.entries_in(MealSlot::Lunch).count(), 2);
    let actual = log.actual.unwrap();
    assert!((actual.protein - 140.0).abs() < 0.5);
    assert!((actual.fats - 90.0).abs() < 0.5);
}

#[test]
fn test_balanced_day_saved_and_reloaded() {
    let mut household = household();
    let date = "2024-03-06";
    let budget = household.person_budget("Ana").unwrap();
    let target = budget.require().unwrap();
    let supplements = household.supplement_pair().unwrap();

    let picks = [
        names(&["eggs", "oats"]),
        names(&["tuna", "avocado"]),
        names(&["salmon", "bread"]),
    ];
    let slots: Vec<SlotSelection> = MealSlot::BALANCED
        .into_iter()
        .zip(picks.iter())
        .map(|(slot, foods)| SlotSelection::new(slot, household.resolve_foods(foods).unwrap()))
        .collect();

    let settings = household.settings().clone();
    let allocation = solve(
        ObjectiveMode::Balance,
        &slots,
        &supplements,
        &budget,
        &settings,
    )
    .unwrap();
    let plan = format_balanced(&slots, &supplements, &allocation, &target, &settings);

    assert_eq!(plan.slots.len(), 3);
    assert!((plan.daily_total.protein - 140.0).abs() <= settings.tolerance_for(140.0));
    assert!((plan.daily_total.fats - 90.0).abs() <= settings.tolerance_for(90.0));
    assert!(plan.daily_total.carbs <= 40.0 + settings.tolerance_for(40.0));

    let summed: f64 = plan.slots.iter().map(|s| s.totals.protein).sum();
    assert!((summed - plan.daily_total.protein).abs() < 1e-6);
    for slot in &plan.slots {
        assert!((slot.goal.protein - 140.0 / 3.0).abs() < 1e-9);
    }

    household.record_plan("Ana", date, &plan).unwrap();

    let dir = TempDir::new().unwrap();
    let path = dir.path().join("household.json");
    save_household(&path, &household).unwrap();
    let reloaded = load_household(&path).unwrap();

    let log = reloaded.find_log("Ana", date).unwrap();
    assert_eq!(log.required.protein, Some(140.0));
    for slot in MealSlot::BALANCED {
        assert!(
            log.entries_in(slot).count() > 0,
            "{} has no logged entries",
            slot
        );
    }
    let actual = log.actual.unwrap();
    assert!((actual.protein - 140.0).abs() < 1.0);
}

#[test]
fn test_unknown_food_suggests_close_names() {
    let household = household();
    let err = household.resolve_food("salmn").unwrap_err();
    assert!(err.to_string().contains("Salmon Fillet"));
}

#[test]
fn test_supplements_hidden_from_selection() {
    let household = household();
    let selectable = household.selectable_foods();
    assert!(selectable.iter().all(|f| f.id != "whey" && f.id != "mct-oil"));
    assert_eq!(selectable.len(), 6);
}

#[test]
fn test_exactly_used_up_day_finishes_with_nothing() {
    let mut household = Household::new(HouseholdFile {
        foods: vec![
            Food::new("broth", "Bone Broth", 0.1, 0.1, 0.1),
            Food::new("pickle", "Pickle", 0.2, 0.2, 0.2),
            Food::new("salmon", "Salmon Fillet", 20.0, 0.0, 13.0),
            Food::new("whey", "Whey Isolate", 25.0, 1.0, 0.5),
            Food::new("mct-oil", "MCT Oil", 0.0, 0.0, 14.0),
        ],
        people: vec![Person::new("Bo", 0.3, 0.3, 0.3)],
        supplements: Some(SupplementIds {
            protein: "whey".to_string(),
            fat: "mct-oil".to_string(),
        }),
        ..Default::default()
    })
    .unwrap();
    let date = "2024-03-07";
    household
        .add_entry("Bo", date, MealSlot::Breakfast, "broth", 1.0)
        .unwrap();
    household
        .add_entry("Bo", date, MealSlot::Lunch, "pickle", 1.0)
        .unwrap();

    let log = household.find_log("Bo", date).unwrap();
    let remaining = log_remaining(&household, log, MealSlot::Dinner).unwrap();
    let dinner = SlotSelection::new(MealSlot::Dinner, vec![household.resolve_food("salmon").unwrap()]);

    let allocation = solve(
        ObjectiveMode::MinimizeSupplement,
        slice::from_ref(&dinner),
        &household.supplement_pair().unwrap(),
        &remaining,
        household.settings(),
    )
    .unwrap();

    assert_eq!(allocation.servings, vec![vec![0.0]]);
    assert_eq!(allocation.supplements.total(), 0.0);
}

#[test]
fn test_finish_uses_logged_macros_over_catalog() {
    let date = "2024-03-08";
    let mut log = DailyLog::new("Ana", date, MacroBudget::new(100.0, 40.0, 60.0));
    // Logged when eggs were 7 g protein each; the catalog now says 6.
    log.entries.push(MealEntry {
        slot: MealSlot::Breakfast,
        food: "eggs".to_string(),
        servings: 3.0,
        macros: Some(Macros::new(21.0, 1.5, 15.0)),
        notes: String::new(),
    });
    // Since removed from the catalog.
    log.entries.push(MealEntry {
        slot: MealSlot::Lunch,
        food: "tofu".to_string(),
        servings: 1.0,
        macros: Some(Macros::new(10.0, 2.0, 5.0)),
        notes: String::new(),
    });
    let mut file = household().to_file();
    file.logs.push(log);
    let household = Household::new(file).unwrap();

    let log = household.find_log("Ana", date).unwrap();
    let remaining = log_remaining(&household, log, MealSlot::Dinner).unwrap();
    let target = remaining.require().unwrap();
    assert!((target.protein - 69.0).abs() < 1e-9);

    let fixed = household.fixed_slots(log, MealSlot::Dinner).unwrap();
    assert_eq!(fixed.len(), 2);
    assert!((fixed[0].totals().protein - 21.0).abs() < 1e-9);
    assert_eq!(fixed[1].lines[0].name, "tofu");

    let supplements = household.supplement_pair().unwrap();
    let solved = SlotSelection::new(
        MealSlot::Dinner,
        household.resolve_foods(&names(&["tuna", "avocado"])).unwrap(),
    );
    let settings = household.settings().clone();
    let allocation = solve(
        ObjectiveMode::MinimizeSupplement,
        slice::from_ref(&solved),
        &supplements,
        &remaining,
        &settings,
    )
    .unwrap();
    let plan = format_remaining(&fixed, &solved, &supplements, &allocation, &target, &settings);

    // Fixed meals plus the remaining budget add back up to the day's targets.
    assert!((plan.budget.protein - 100.0).abs() < 1e-9);
    assert!((plan.budget.fats - 60.0).abs() < 1e-9);
    assert!((plan.daily_total.protein - 100.0).abs() <= settings.tolerance_for(100.0));
    assert!((plan.daily_total.fats - 60.0).abs() <= settings.tolerance_for(60.0));
    assert!((plan.slot(MealSlot::Breakfast).unwrap().goal.protein - 21.0).abs() < 1e-9);
}
