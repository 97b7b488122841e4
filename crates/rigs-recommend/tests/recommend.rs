use rigs_recommend::template::CategoryTarget;
use rigs_recommend::{
    BuildTemplate, EngineConfig, ExpansionStrategy, Preferences, Recommender, RecommenderState,
};
use rigs_spec::{Batch, Category, Component};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn stocked(component: Component, remaining: u32, price: Decimal) -> Component {
    let id = component.id.clone();
    component.with_batch(Batch {
        batch_id: format!("{id}-1"),
        quantity: remaining.max(1),
        remaining,
        buy_price: Decimal::ZERO,
        sell_price: price,
        date_added: None,
    })
}

fn catalog() -> Vec<Component> {
    vec![
        stocked(
            Component::new("cpu-am4", "Ryzen 5 5600", Category::Cpu)
                .with_spec("Socket", "AM4")
                .with_spec("Cores", "6")
                .with_spec("Threads", "12")
                .with_spec("Base Clock", "3.5GHz")
                .with_power_draw(65.0),
            4,
            dec!(2500),
        ),
        stocked(
            Component::new("cpu-lga", "Core i3-12100", Category::Cpu)
                .with_spec("Socket", "LGA1700")
                .with_spec("Cores", "4")
                .with_spec("Threads", "8")
                .with_spec("Base Clock", "3.3GHz")
                .with_power_draw(60.0),
            4,
            dec!(2000),
        ),
        stocked(
            Component::new("cpu-pricey", "Ryzen 7 5800X3D", Category::Cpu)
                .with_spec("Socket", "AM4")
                .with_spec("Cores", "8"),
            2,
            dec!(5000),
        ),
        stocked(
            Component::new("mb-am4", "B550M", Category::Motherboard)
                .with_spec("Socket", "AM4")
                .with_spec("Memory Type", "DDR4"),
            3,
            dec!(1800),
        ),
        stocked(
            Component::new("ram-ddr4", "8GB DDR4", Category::Ram)
                .with_spec("Type", "DDR4")
                .with_spec("Capacity", "8GB")
                .with_spec("Speed", "3200MHz"),
            10,
            dec!(900),
        ),
        stocked(
            Component::new("ram-ddr5", "16GB DDR5", Category::Ram)
                .with_spec("Type", "DDR5")
                .with_spec("Capacity", "16GB")
                .with_spec("Speed", "6000MHz"),
            10,
            dec!(950),
        ),
        stocked(
            Component::new("gpu-a", "RX 6600", Category::Gpu)
                .with_spec("VRAM", "8GB")
                .with_spec("Core Clock", "1500MHz")
                .with_power_draw(200.0),
            2,
            dec!(2900),
        ),
        stocked(
            Component::new("gpu-b", "GT 1030", Category::Gpu)
                .with_spec("VRAM", "2GB")
                .with_spec("Core Clock", "300MHz")
                .with_power_draw(30.0),
            2,
            dec!(1500),
        ),
        stocked(
            Component::new("gpu-soldout", "RX 7600", Category::Gpu)
                .with_spec("VRAM", "12GB")
                .with_power_draw(165.0),
            0,
            dec!(2000),
        ),
        stocked(
            Component::new("psu-450", "450W Bronze", Category::Psu).with_spec("Wattage", "450W"),
            5,
            dec!(800),
        ),
        stocked(
            Component::new("psu-300", "300W", Category::Psu).with_spec("Wattage", "300W"),
            5,
            dec!(500),
        ),
    ]
}

fn template() -> BuildTemplate {
    BuildTemplate::new("test", dec!(10000))
        .with_category(CategoryTarget::new(Category::Cpu, dec!(0.3), 20.0))
        .with_category(CategoryTarget::new(Category::Motherboard, dec!(0.2), 0.0))
        .with_category(CategoryTarget::new(Category::Ram, dec!(0.1), 0.0))
        .with_category(CategoryTarget::new(Category::Gpu, dec!(0.3), 0.0))
        .with_category(CategoryTarget::new(Category::Psu, dec!(0.1), 0.0))
}

fn ids<'c>(build: &rigs_recommend::CandidateBuild<'c>) -> Vec<&'c str> {
    build.parts.values().map(|p| p.id).collect()
}

#[test]
fn recommends_the_best_compatible_build() {
    let catalog = catalog();
    let recommender = Recommender::new(&catalog, EngineConfig::default());
    let state = RecommenderState::default();

    let build = recommender
        .recommend_build(&state, &template(), dec!(10000), &Preferences::new())
        .unwrap()
        .expect("a feasible build");

    assert_eq!(ids(&build), vec!["cpu-am4", "mb-am4", "ram-ddr4", "gpu-a", "psu-450"]);
    assert_eq!(build.total_price, dec!(8900));
    assert!(build.compatibility.compatible);
    assert!(build.objective > 0.0);
}

#[test]
fn every_returned_build_is_compatible_and_ranked() {
    let catalog = catalog();
    let recommender = Recommender::new(&catalog, EngineConfig::default());
    let builds = recommender
        .recommend_builds(
            &RecommenderState::default(),
            &template(),
            dec!(10000),
            &Preferences::new(),
            10,
        )
        .unwrap();

    assert!(builds.len() >= 2);
    assert!(builds.iter().all(|b| b.compatibility.compatible));
    assert!(builds.windows(2).all(|w| w[0].objective >= w[1].objective));
    for build in &builds {
        assert_eq!(build.part(Category::Cpu).unwrap().id, "cpu-am4");
        assert_ne!(build.part(Category::Ram).unwrap().id, "ram-ddr5");
    }
}

#[test]
fn out_of_stock_components_never_appear() {
    let catalog = catalog();
    let recommender = Recommender::new(&catalog, EngineConfig::default());
    let builds = recommender
        .recommend_builds(
            &RecommenderState::default(),
            &template(),
            dec!(10000),
            &Preferences::new(),
            usize::MAX,
        )
        .unwrap();

    assert!(!builds.is_empty());
    for build in &builds {
        assert!(build.components().all(|c| c.id != "gpu-soldout"));
    }
}

#[test]
fn builds_respect_scaled_budget_shares() {
    let catalog = catalog();
    let recommender = Recommender::new(&catalog, EngineConfig::default());
    let template = template();

    for budget in [dec!(10000), dec!(12000), dec!(20000)] {
        let targets = template.scale(budget);
        let builds = recommender
            .recommend_builds(&RecommenderState::default(), &template, budget, &Preferences::new(), 50)
            .unwrap();
        for build in &builds {
            for target in &targets {
                let part = build.part(target.category).unwrap();
                assert!(part.price <= target.budget, "{} over its share", part.id);
            }
        }
    }
}

#[test]
fn infeasible_budget_yields_none() {
    let catalog = catalog();
    let recommender = Recommender::new(&catalog, EngineConfig::default());
    let build = recommender
        .recommend_build(&RecommenderState::default(), &template(), dec!(1000), &Preferences::new())
        .unwrap();
    assert!(build.is_none());

    let build = recommender
        .recommend_build(&RecommenderState::default(), &template(), dec!(-5), &Preferences::new())
        .unwrap();
    assert!(build.is_none());
}

#[test]
fn missing_category_yields_none() {
    let catalog = catalog();
    let recommender = Recommender::new(&catalog, EngineConfig::default());
    let template = template().with_category(CategoryTarget::new(Category::Case, dec!(0.0), 0.0));
    let build = recommender
        .recommend_build(&RecommenderState::default(), &template, dec!(10000), &Preferences::new())
        .unwrap();
    assert!(build.is_none());
}

#[test]
fn invalid_template_is_an_error() {
    let catalog = catalog();
    let recommender = Recommender::new(&catalog, EngineConfig::default());
    let template = BuildTemplate::new("broken", Decimal::ZERO)
        .with_category(CategoryTarget::new(Category::Cpu, dec!(0.5), 0.0));
    let err = recommender
        .recommend_build(&RecommenderState::default(), &template, dec!(10000), &Preferences::new())
        .unwrap_err();
    assert!(err.to_string().starts_with("Invalid template 'broken'"));
}

#[test]
fn preferences_weight_the_performance_term() {
    let catalog = catalog();
    let recommender = Recommender::new(&catalog, EngineConfig::default());
    let state = RecommenderState::default();

    let neutral = recommender
        .recommend_build(&state, &template(), dec!(10000), &Preferences::new())
        .unwrap()
        .unwrap();
    // CPU 100, motherboard 50, RAM 72, GPU 100, PSU 50
    assert!((neutral.performance_score - 74.4).abs() < 1e-9);

    let prefs = Preferences::from([(Category::Gpu, 0.0)]);
    let no_gpu = recommender
        .recommend_build(&state, &template(), dec!(10000), &prefs)
        .unwrap()
        .unwrap();
    assert!((no_gpu.performance_score - 68.0).abs() < 1e-9);
}

#[test]
fn feedback_adjusts_ranking_scores() {
    let catalog = catalog();
    let recommender = Recommender::new(&catalog, EngineConfig::default());
    let mut state = RecommenderState::default();

    let build = recommender
        .recommend_build(&state, &template(), dec!(10000), &Preferences::new())
        .unwrap()
        .unwrap();
    state.record_feedback(&build, true);

    let ram = state.preference("ram-ddr4").unwrap();
    assert!((ram.score - 74.8).abs() < 1e-9);
    assert_eq!(ram.interactions, 1);

    state.record_feedback(&build, false);
    let ram = state.preference("ram-ddr4").unwrap();
    assert!((ram.score - 71.06).abs() < 1e-9);
    assert_eq!(state.history_len(), 2);

    let again = recommender
        .recommend_build(&state, &template(), dec!(10000), &Preferences::new())
        .unwrap()
        .unwrap();
    assert!((again.part(Category::Ram).unwrap().score - 71.06).abs() < 1e-9);
}

#[test]
fn history_evicts_oldest_first() {
    let catalog = catalog();
    let recommender = Recommender::new(&catalog, EngineConfig::default());
    let mut state = RecommenderState::with_history_capacity(3);
    let build = recommender
        .recommend_build(&state, &template(), dec!(10000), &Preferences::new())
        .unwrap()
        .unwrap();

    for i in 0..5 {
        state.record_feedback(&build, i % 2 == 0);
    }
    let decisions: Vec<bool> = state.history().map(|d| d.accepted).collect();
    assert_eq!(decisions, vec![true, false, true]);
    assert_eq!(state.preference("gpu-a").unwrap().interactions, 5);
}

#[test]
fn state_survives_serialization() {
    let catalog = catalog();
    let recommender = Recommender::new(&catalog, EngineConfig::default());
    let mut state = RecommenderState::default();
    let build = recommender
        .recommend_build(&state, &template(), dec!(10000), &Preferences::new())
        .unwrap()
        .unwrap();
    state.record_feedback(&build, true);

    let json = serde_json::to_string(&state).unwrap();
    let restored: RecommenderState = serde_json::from_str(&json).unwrap();
    assert_eq!(restored.history_len(), 1);
    assert_eq!(restored.history_capacity(), state.history_capacity());
    assert_eq!(
        restored.history().next().unwrap().components,
        vec!["cpu-am4", "mb-am4", "ram-ddr4", "gpu-a", "psu-450"]
    );
    for id in ["cpu-am4", "ram-ddr4", "psu-450"] {
        let before = state.preference(id).unwrap();
        let after = restored.preference(id).unwrap();
        assert_eq!(after.interactions, before.interactions);
        assert!((after.score - before.score).abs() < 1e-9);
    }
}

#[test]
fn builds_serialize_for_callers() {
    let catalog = catalog();
    let recommender = Recommender::new(&catalog, EngineConfig::default());
    let build = recommender
        .recommend_build(&RecommenderState::default(), &template(), dec!(10000), &Preferences::new())
        .unwrap()
        .unwrap();

    let json = serde_json::to_value(&build).unwrap();
    assert_eq!(json["template"], "test");
    assert_eq!(json["parts"]["CPU"]["id"], "cpu-am4");
    assert_eq!(json["compatibility"]["compatible"], true);
    assert!(json["profile"]["gaming"].is_number());
}

#[test]
fn expansion_strategy_changes_what_survives_the_limit() {
    let catalog = catalog();
    let first_n = EngineConfig {
        combination_limit: 2,
        ..EngineConfig::default()
    };
    let top_k = EngineConfig {
        expansion: ExpansionStrategy::TopK,
        ..first_n.clone()
    };
    let state = RecommenderState::default();

    // Catalog order keeps the DDR4 kit; score order keeps only the DDR5 kit
    let build = Recommender::new(&catalog, first_n)
        .recommend_build(&state, &template(), dec!(10000), &Preferences::new())
        .unwrap();
    assert!(build.is_some());

    let build = Recommender::new(&catalog, top_k)
        .recommend_build(&state, &template(), dec!(10000), &Preferences::new())
        .unwrap();
    assert!(build.is_none());
}
