use bindery::{
    ArgValue, BindableEnum, BindableModel, EventRegister, InvokeError, PropertyValue, Sprite,
    Updater,
};
use bindery_testing_fixtures::{
    Settings,
    game::{Boss, Class, Counter, Entity, Loot, Npc, Perk, Player, Shop, Tally, ui::Label},
};
use std::{cell::RefCell, rc::Rc};

///
/// Recorder
///
/// Consumer that remembers every pushed value, installed per test thread.
///

type Call = (String, String, PropertyValue<'static>);

#[derive(Clone, Default)]
struct Recorder(Rc<RefCell<Vec<Call>>>);

impl Recorder {
    fn install() -> Self {
        let recorder = Self::default();
        bindery::set_updater(Box::new(recorder.clone()));

        recorder
    }

    fn names(&self) -> Vec<String> {
        self.0.borrow().iter().map(|(_, name, _)| name.clone()).collect()
    }

    fn values(&self) -> Vec<(String, PropertyValue<'static>)> {
        self.0
            .borrow()
            .iter()
            .map(|(_, name, value)| (name.clone(), value.clone()))
            .collect()
    }

    fn clear(&self) {
        self.0.borrow_mut().clear();
    }
}

impl Updater for Recorder {
    fn update_ui(&mut self, model: &dyn BindableModel, property_name: &str, value: PropertyValue<'_>) {
        self.0.borrow_mut().push((
            model.type_info().type_name.to_string(),
            property_name.to_string(),
            value.into_owned(),
        ));
    }
}

fn track_events(player: &mut Player) -> Rc<RefCell<Vec<String>>> {
    let fired = Rc::new(RefCell::new(Vec::new()));

    let log = Rc::clone(&fired);
    player
        .on_property_changed
        .subscribe(move |name, _, _| log.borrow_mut().push(name.to_string()));

    fired
}

//
// METADATA
//

#[test]
fn metadata_lists_merged_properties_once() {
    let info = Player::TYPE_INFO;

    assert_eq!(info.type_name, "Player");
    assert_eq!(info.type_full_name, "game::Player");
    assert!(!info.sealed);

    let scores = info.properties.iter().filter(|p| p.name == "Score").count();
    assert_eq!(scores, 1);
    assert!(!info.property("Score").expect("score").inherited);

    assert!(info.property("Name").expect("name").inherited);
    assert!(info.property("IsAlive").expect("is_alive").inherited);
    assert_eq!(info.property("Nickname").expect("nickname").type_full_name, "String");
    assert_eq!(
        info.property("Party").expect("party").type_full_name,
        "Vec<game::Class>"
    );

    for hidden in ["Secret", "Title", "History", "ManaReads"] {
        assert!(info.property(hidden).is_none(), "{hidden}");
    }
}

#[test]
fn type_info_is_the_static_table() {
    let player = Player::default();

    assert_eq!(*player.type_info(), Player::TYPE_INFO);
    assert!(Boss::TYPE_INFO.sealed);
    assert!(Npc::TYPE_INFO.sealed);
    assert_eq!(Label::TYPE_INFO.type_full_name, "game::ui::Label");
    assert_eq!(Settings::TYPE_INFO.type_full_name, "Settings");
}

//
// SETTERS
//

#[test]
fn same_value_is_a_no_op() {
    let recorder = Recorder::install();
    let mut player = Player::default();
    let fired = track_events(&mut player);

    player.set_health(0);
    player.set_nickname(String::new());

    assert!(recorder.names().is_empty());
    assert!(fired.borrow().is_empty());
}

#[test]
fn also_notify_pushes_target_after_owner() {
    let recorder = Recorder::install();
    let mut player = Player::default();
    let fired = track_events(&mut player);

    player.set_health(100);
    assert_eq!(
        recorder.values(),
        [
            ("Health".to_string(), PropertyValue::Int(100)),
            ("IsAlive".to_string(), PropertyValue::Bool(true)),
        ]
    );
    assert_eq!(*fired.borrow(), ["Health", "IsAlive"]);

    // IsAlive is still pushed but has not changed
    recorder.clear();
    fired.borrow_mut().clear();
    player.set_health(50);
    assert_eq!(recorder.names(), ["Health", "IsAlive"]);
    assert_eq!(*fired.borrow(), ["Health"]);

    recorder.clear();
    fired.borrow_mut().clear();
    player.set_health(0);
    assert_eq!(
        recorder.values()[1],
        ("IsAlive".to_string(), PropertyValue::Bool(false))
    );
    assert_eq!(*fired.borrow(), ["Health", "IsAlive"]);
}

#[test]
fn events_carry_old_values() {
    let _recorder = Recorder::install();
    let mut player = Player::default();
    let old = Rc::new(RefCell::new(Vec::new()));

    let log = Rc::clone(&old);
    player.on_property_changed.subscribe(move |name, owner: &Player, previous| {
        if name == "Rank" {
            let previous = previous.downcast_ref::<String>().cloned();
            log.borrow_mut().push((previous, owner.rank().to_string()));
        }
    });

    player.set_level(5);
    assert!(old.borrow().is_empty());

    player.set_level(12);
    assert_eq!(
        *old.borrow(),
        [(Some("Novice".to_string()), "Veteran".to_string())]
    );
}

#[test]
fn injected_code_runs_around_the_write() {
    let _recorder = Recorder::install();
    let mut player = Player::default();

    player.set_mana(10);
    player.set_mana(10);
    player.set_mana(25);

    assert_eq!(player.mana_history().iter().copied().collect::<Vec<_>>(), [0, 10]);
    assert_eq!(player.mana_changes(), 2);

    let reads = player.mana_reads();
    assert_eq!(player.mana(), 25);
    assert_eq!(player.mana_reads(), reads + 1);
}

#[test]
fn dont_notify_fields_stay_silent() {
    let recorder = Recorder::install();
    let mut player = Player::default();

    player.set_secret(9);

    assert_eq!(player.secret(), 9);
    assert!(recorder.names().is_empty());
}

#[test]
fn non_scalar_values_are_pushed_in_wire_shape() {
    let recorder = Recorder::install();
    let mut player = Player::default();

    player.set_party(vec![Class::Mage, Class::Rogue]);
    player.set_tags(vec!["tank".into()]);
    player.set_portrait(Sprite::new("hero.png"));
    player.set_class(Class::Rogue);
    player.set_perk(Perk::Lucky);

    let values: Vec<_> = recorder.values().into_iter().map(|(_, v)| v).collect();
    assert_eq!(
        values,
        [
            PropertyValue::ListEnum(vec![1, 2].into()),
            PropertyValue::ListString(vec!["tank".to_string()].into()),
            PropertyValue::Sprite(std::borrow::Cow::Owned(Sprite::new("hero.png"))),
            PropertyValue::Int(2),
            PropertyValue::Int(4),
        ]
    );
    assert_eq!(player.party(), [Class::Mage, Class::Rogue]);
    assert_eq!(player.portrait().path(), "hero.png");
}

//
// DISPATCH
//

#[test]
fn update_int_touches_only_the_named_property() {
    let _recorder = Recorder::install();

    let cases: [(&str, fn(&Player) -> i32); 4] = [
        ("Health", Player::health),
        ("Level", Player::level),
        ("Mana", Player::mana),
        ("Score", Player::score),
    ];

    for (name, read) in cases {
        let mut player = Player::default();
        player.update_int(name, 7);

        for (other, other_read) in cases {
            let expected = if other == name { 7 } else { 0 };
            assert_eq!(other_read(&player), expected, "{name} -> {other}");
        }
        assert_eq!(read(&player), 7);

        // Entity keeps its own hidden Score copy
        let entity_score = if name == "Score" { 7 } else { 0 };
        assert_eq!(player.entity().score(), entity_score, "{name} -> Entity::Score");
    }
}

#[test]
fn update_int_converts_enums() {
    let _recorder = Recorder::install();
    let mut player = Player::default();

    player.update_int("Class", 1);
    assert_eq!(player.class(), Class::Mage);

    // no such variant
    player.update_int("Class", 99);
    assert_eq!(player.class(), Class::Mage);

    player.update_int("Perk", 2);
    assert_eq!(player.perk(), Perk::Strong);
}

#[test]
fn unknown_names_are_ignored() {
    let recorder = Recorder::install();
    let mut player = Player::default();

    player.update_int("Nope", 1);
    player.update_float("Health", 1.0);
    player.update_bool("Speed", true);

    assert!(recorder.names().is_empty());
    assert_eq!(player.health(), 0);
}

#[test]
fn two_candidates_dispatch_through_a_chain() {
    let _recorder = Recorder::install();
    let mut label = Label::default();

    label.update_bool("Visible", true);
    assert!(label.visible());
    assert!(!label.enabled());

    label.update_bool("Enabled", true);
    label.update_string("Text", "ok");
    assert!(label.enabled());
    assert_eq!(label.text(), "ok");
}

#[test]
fn three_candidates_dispatch_through_a_match() {
    let _recorder = Recorder::install();
    let mut boss = Boss::default();

    boss.update_float("Armor", 2.5);

    assert!((boss.armor() - 2.5).abs() < f32::EPSILON);
    assert!(boss.rage().abs() < f32::EPSILON);
    assert!(boss.damage().abs() < f32::EPSILON);
}

#[test]
fn update_by_name_routes_by_value_shape() {
    let _recorder = Recorder::install();
    let mut player = Player::default();

    player.update_by_name("Speed", PropertyValue::Float(1.5));
    player.update_by_name("Nickname", PropertyValue::String("Ace".into()));
    player.update_by_name("Party", PropertyValue::ListEnum(vec![1].into()));

    assert!((player.speed() - 1.5).abs() < f32::EPSILON);
    assert_eq!(player.nickname(), "Ace");
    assert!(player.party().is_empty());
}

//
// INHERITANCE
//

#[test]
fn ancestors_handle_their_own_properties() {
    let recorder = Recorder::install();
    let mut player = Player::default();

    player.update_string("Name", "Ann");

    assert_eq!(player.entity().name(), "Ann");
    assert_eq!(recorder.0.borrow()[0].0, "Entity");
}

#[test]
fn push_all_starts_with_the_ancestor() {
    let _recorder = Recorder::install();
    let mut player = Player::default();
    player.entity_mut().set_name("Ann".into());
    player.set_health(3);

    let mut sink: Vec<(String, PropertyValue<'static>)> = Vec::new();
    player.push_all(&mut sink);

    let names: Vec<_> = sink.iter().map(|(name, _)| name.as_str()).collect();
    assert_eq!(&names[..3], ["Score", "Name", "Health"]);
    assert!(!names.contains(&"IsAlive"));
    assert_eq!(sink[1].1, PropertyValue::String("Ann".into()));
}

#[test]
fn push_one_sends_a_single_value() {
    let _recorder = Recorder::install();
    let mut player = Player::default();
    player.set_nickname("Ace".into());

    let mut sink: Vec<(String, PropertyValue<'static>)> = Vec::new();
    player.push_one("Nickname", &mut sink);
    assert_eq!(sink, [("Nickname".to_string(), PropertyValue::String("Ace".into()))]);

    sink.clear();
    player.push_one("Name", &mut sink);
    assert_eq!(sink.len(), 1);

    sink.clear();
    player.push_one("Missing", &mut sink);
    assert!(sink.is_empty());
}

#[test]
fn auto_notify_base_handles_its_own_properties() {
    let recorder = Recorder::install();
    let mut tally = Tally::default();

    tally.update_int("Count", 4);
    tally.update_int("Bonus", 2);

    assert_eq!(tally.counter().count(), 4);
    assert_eq!(tally.bonus(), 2);
    assert_eq!(recorder.names(), ["Count", "Bonus"]);
    assert_eq!(recorder.0.borrow()[0].0, "Counter");
    assert!(Tally::TYPE_INFO.property("Count").is_some());

    let mut sink: Vec<(String, PropertyValue<'static>)> = Vec::new();
    tally.push_all(&mut sink);

    let names: Vec<_> = sink.iter().map(|(name, _)| name.as_str()).collect();
    assert_eq!(names, ["Count", "Caption", "Bonus"]);
}

//
// ENUMS
//

#[test]
fn enums_round_trip_through_ints() {
    assert_eq!(Class::Rogue.to_int(), 2);
    assert_eq!(Class::from_int(1), Some(Class::Mage));
    assert_eq!(Class::from_int(3), None);

    assert_eq!(Perk::Lucky.to_int(), 4);
    // combinations have no variant
    assert_eq!(Perk::from_int(3), None);
}

#[test]
fn type_info_registers_referenced_enums() {
    let _ = Npc::default().type_info();
    let _ = Player::default().type_info();

    let class = bindery::enums::get("game::Class").expect("class registered");
    assert!(!class.flags);
    assert_eq!(class.value(1).and_then(|v| v.alias("fr")), Some("Magicien"));
    assert_eq!(
        class.value_by_name("Rogue").and_then(|v| v.alias(bindery::LOCALE_NONE)),
        Some("Thief")
    );

    let perk = bindery::enums::get("game::Perk").expect("perk registered");
    assert!(perk.flags);
    assert!(std::ptr::eq(perk, Perk::enum_info()));
}

//
// AUTO NOTIFY
//

#[test]
fn auto_notify_types_push_without_events() {
    let recorder = Recorder::install();
    let mut counter = Counter::default();
    counter.set_step(2);

    counter.increment();
    counter.set_caption("clicks".into());
    counter.update_int("Count", 2);

    assert_eq!(counter.count(), 2);
    assert_eq!(counter.step(), 2);
    assert_eq!(
        recorder.values(),
        [
            ("Count".to_string(), PropertyValue::Int(2)),
            ("Caption".to_string(), PropertyValue::String("clicks".into())),
        ]
    );
    assert!(Counter::TYPE_INFO.property("Step").is_none());
}

#[test]
fn root_namespace_types_are_included() {
    let recorder = Recorder::install();
    let mut settings = Settings::default();

    settings.update_bool("Muted", true);

    assert!(settings.muted());
    assert_eq!(recorder.names(), ["Muted"]);
}

//
// EVENT CALLS
//

fn event_names(model: &dyn EventRegister) -> Vec<&'static str> {
    model.event_calls().iter().map(|c| c.event_name).collect()
}

#[test]
fn event_calls_list_ancestors_first() {
    let player = Player::default();

    assert_eq!(
        event_names(&player),
        ["Rename", "heal", "Respec", "Recruit", "DrainMana", "Taunt"]
    );
    assert_eq!(event_names(&Entity::default()), ["Rename"]);

    let calls = player.event_calls();
    let respec = calls.iter().find(|c| c.event_name == "Respec").expect("respec");
    assert_eq!(respec.method_name, "respec");
    assert_eq!(respec.type_full_name, "game::Player");
    assert_eq!(respec.views, ["hud"]);
    assert_eq!(respec.return_type, Some("bool"));
    assert_eq!(respec.arguments[0].kind, bindery::ArgumentKind::Enum);
    assert_eq!(respec.arguments[0].name, "class");
}

#[test]
fn invoke_runs_the_named_method() {
    let _recorder = Recorder::install();
    let mut player = Player::default();

    let result = player.invoke_event("heal", "hud", vec![5.into()]).expect("heal");
    assert!(result.is_none());
    assert_eq!(player.health(), 5);

    let changed = player
        .invoke_event("Respec", "hud", vec![Class::Mage.to_int().into()])
        .expect("respec")
        .and_then(|r| r.downcast::<bool>().ok());
    assert_eq!(changed.as_deref(), Some(&true));
    assert_eq!(player.class(), Class::Mage);
}

#[test]
fn invoke_delegates_ancestor_calls() {
    let recorder = Recorder::install();
    let mut player = Player::default();

    player.invoke_event("Rename", "any", vec!["Ann".into()]).expect("rename");

    assert_eq!(player.entity().name(), "Ann");
    assert_eq!(recorder.0.borrow()[0].0, "Entity");
}

#[test]
fn static_and_ref_arguments() {
    let _recorder = Recorder::install();
    let mut player = Player::default();

    let recruit = player
        .invoke_event("Recruit", "hud", vec!["Bo".into(), 12.into()])
        .expect("recruit")
        .and_then(|r| r.downcast::<Player>().ok())
        .expect("player returned");
    assert_eq!(recruit.entity().name(), "Bo");
    assert_eq!(recruit.rank(), "Veteran");
    assert_eq!(player.level(), 0);

    player.set_mana(9);
    player.invoke_event("DrainMana", "hud", vec![1.into()]).expect("drain");
    assert_eq!(player.mana(), 0);
}

#[test]
fn views_and_shapes_are_checked() {
    let _recorder = Recorder::install();
    let mut player = Player::default();

    assert!(matches!(
        player.invoke_event("Taunt", "hud", vec![]),
        Err(InvokeError::UnknownEvent(name)) if name == "Taunt"
    ));
    player.invoke_event("Taunt", "arena", vec![]).expect("taunt");
    assert_eq!(player.nickname(), "Taunter");

    assert!(matches!(
        player.invoke_event("heal", "hud", vec!["lots".into()]),
        Err(InvokeError::ArgumentMismatch { method: "heal", index: 0, .. })
    ));
    assert!(matches!(
        player.invoke_event("Respec", "hud", vec![]),
        Err(InvokeError::MissingArgument { method: "respec", index: 0 })
    ));
    assert!(matches!(
        player.invoke_event("Respec", "hud", vec![9.into()]),
        Err(InvokeError::ArgumentMismatch { .. })
    ));

    // filtered out when the calls were generated
    assert!(player.invoke_event("tag_all", "hud", vec![]).is_err());
    assert!(player.invoke_event("pick", "hud", vec![]).is_err());
}

#[test]
fn hand_written_types_take_custom_arguments() {
    let mut shop = Shop {
        open: true,
        ..Shop::default()
    };
    let loot = Loot {
        name: "Potion".into(),
        price: 3,
    };

    let bought = shop
        .invoke_event("Buy", "town", vec![ArgValue::custom(loot), 2.into()])
        .expect("buy")
        .and_then(|r| r.downcast::<bool>().ok());
    assert_eq!(bought.as_deref(), Some(&true));
    assert_eq!(shop.gold, 6);
    assert_eq!(shop.sold, ["Potion"]);

    assert!(matches!(
        shop.invoke_event("Buy", "town", vec![ArgValue::custom(7u8), 1.into()]),
        Err(InvokeError::ArgumentMismatch { index: 0, .. })
    ));

    shop.invoke_event("close", "town", vec![]).expect("close");
    assert!(!shop.open);
}
