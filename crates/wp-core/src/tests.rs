//! Unit tests for wp-core primitives.

#[cfg(test)]
mod ids {
    use crate::{ActionId, AgentId};

    #[test]
    fn parse_rejects_blank() {
        assert!(AgentId::parse("").is_err());
        assert!(AgentId::parse("   ").is_err());
        assert_eq!(AgentId::parse("agent-1").unwrap().as_str(), "agent-1");
    }

    #[test]
    fn new_allows_empty_action() {
        let id = ActionId::new("");
        assert!(id.is_empty());
        assert_eq!(ActionId::default(), id);
    }

    #[test]
    fn display_is_raw_value() {
        assert_eq!(ActionId::from("a-17").to_string(), "a-17");
    }

    #[test]
    fn clones_share_storage() {
        let a = AgentId::new("agent-9");
        let b = a.clone();
        assert_eq!(a, b);
        assert_eq!(a.as_str().as_ptr(), b.as_str().as_ptr());
    }
}

#[cfg(test)]
mod geo {
    use crate::{Cell, GridLayout, WorldPoint};

    #[test]
    fn manhattan() {
        assert_eq!(Cell::new(0, 0).manhattan(Cell::new(3, 4)), 7);
        assert_eq!(Cell::new(-2, 1).manhattan(Cell::new(2, -1)), 6);
    }

    #[test]
    fn neighbor_order_is_up_down_left_right() {
        let n: Vec<Cell> = Cell::new(5, 5).neighbors().collect();
        assert_eq!(
            n,
            vec![Cell::new(5, 6), Cell::new(5, 4), Cell::new(4, 5), Cell::new(6, 5)]
        );
    }

    #[test]
    fn layout_roundtrip_through_center() {
        let layout = GridLayout::new(WorldPoint::new(-10.0, 4.0), 0.5).unwrap();
        let cell = Cell::new(7, -3);
        assert_eq!(layout.world_to_cell(layout.cell_center(cell)), cell);
    }

    #[test]
    fn world_to_cell_floors_negative_coordinates() {
        let layout = GridLayout::unit();
        assert_eq!(layout.world_to_cell(WorldPoint::new(-0.2, 0.9)), Cell::new(-1, 0));
    }

    #[test]
    fn layout_rejects_bad_cell_size() {
        assert!(GridLayout::new(WorldPoint::ZERO, 0.0).is_err());
        assert!(GridLayout::new(WorldPoint::ZERO, -1.0).is_err());
        assert!(GridLayout::new(WorldPoint::ZERO, f32::NAN).is_err());
    }

    #[test]
    fn normalized_zero_stays_zero() {
        assert_eq!(WorldPoint::ZERO.normalized(), WorldPoint::ZERO);
        let n = WorldPoint::new(3.0, 4.0).normalized();
        assert!((n.length() - 1.0).abs() < 1e-6);
    }
}

#[cfg(test)]
mod time {
    use crate::{SimClock, Tick};

    #[test]
    fn tick_arithmetic() {
        let t = Tick(10);
        assert_eq!(t + 5, Tick(15));
        assert_eq!(t.offset(3), Tick(13));
        assert_eq!(Tick(15) - Tick(10), 5u64);
    }

    #[test]
    fn deadlines() {
        let mut clock = SimClock::new();
        let deadline = clock.deadline_after(1.0);
        clock.advance(0.5);
        assert!(!clock.reached(deadline));
        clock.advance(0.5);
        assert!(clock.reached(deadline));
        assert_eq!(clock.current_tick, Tick(2));
    }

    #[test]
    fn negative_dt_does_not_rewind() {
        let mut clock = SimClock::new();
        clock.advance(1.0);
        clock.advance(-5.0);
        assert_eq!(clock.now(), 1.0);
    }
}

#[cfg(test)]
mod rng {
    use crate::SimRng;

    #[test]
    fn deterministic_same_seed() {
        let mut r1 = SimRng::new(12345);
        let mut r2 = SimRng::new(12345);
        for _ in 0..100 {
            assert_eq!(r1.gen_range(0..1000u32), r2.gen_range(0..1000u32));
        }
    }

    #[test]
    fn choose_stays_in_slice() {
        let mut rng = SimRng::new(7);
        let items = [1, 2, 3];
        for _ in 0..50 {
            assert!(items.contains(rng.choose(&items).unwrap()));
        }
        assert!(rng.choose::<u8>(&[]).is_none());
    }
}

#[cfg(test)]
mod command {
    use crate::CommandKind;

    #[test]
    fn parse_known_and_unknown() {
        assert_eq!(CommandKind::parse("go_to"), CommandKind::GoTo);
        assert_eq!(CommandKind::parse("waiting"), CommandKind::Waiting);
        assert_eq!(CommandKind::parse("update_state"), CommandKind::UpdateState);
        assert_eq!(CommandKind::parse("fishing"), CommandKind::Other("fishing".into()));
    }

    #[test]
    fn label_roundtrip() {
        for s in ["go_to", "waiting", "update_state", "sleeping"] {
            assert_eq!(CommandKind::parse(s).as_str(), s);
        }
    }

    #[test]
    fn physical_kinds() {
        assert!(CommandKind::GoTo.is_physical());
        assert!(CommandKind::Waiting.is_physical());
        assert!(!CommandKind::UpdateState.is_physical());
        assert!(!CommandKind::Other("x".into()).is_physical());
    }
}
