use serde::Serialize;
use volley_core::{
    ObjectKind, ObjectState, ObjectTrajectory, TeamSide, Vector3, VehicleId, VehicleState,
    WorldSnapshot,
};

/// Horizon of the predicted trajectory handed to the team logic.
const TRAJECTORY_HORIZON: f64 = 5.0;
const TRAJECTORY_DT: f64 = 1.0 / 120.0;

/// What the harness expects the bot to do, in coarse terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Attack,
    Support,
    Defend,
    Boost,
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Action::Attack => "attack",
            Action::Support => "support",
            Action::Defend => "defend",
            Action::Boost => "boost",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Expectation {
    pub action: Action,
    pub role: Option<usize>,
    pub max_double_commit_risk: f64,
    pub allow_last_man_attack: bool,
}

impl Expectation {
    fn new(action: Action, role: Option<usize>) -> Self {
        Self {
            action,
            role,
            max_double_commit_risk: 1.0,
            allow_last_man_attack: false,
        }
    }

    fn max_risk(mut self, risk: f64) -> Self {
        self.max_double_commit_risk = risk;
        self
    }
}

#[derive(Debug, Clone)]
pub struct Scenario {
    pub id: &'static str,
    pub description: &'static str,
    pub bot: VehicleId,
    pub world: WorldSnapshot,
    pub expectation: Expectation,
    pub tags: &'static [&'static str],
}

fn car(id: u32, team: u8, x: f64, y: f64, vx: f64, vy: f64, boost: f64) -> VehicleState {
    VehicleState::new(
        id,
        TeamSide::from_index(team),
        Vector3::new(x, y, 17.0),
        Vector3::new(vx, vy, 0.0),
        boost,
    )
}

fn snapshot(
    kind: ObjectKind,
    position: [f64; 3],
    velocity: [f64; 2],
    vehicles: Vec<VehicleState>,
) -> WorldSnapshot {
    let object = ObjectState::new(
        Vector3::from(position),
        Vector3::new(velocity[0], velocity[1], 0.0),
    );
    WorldSnapshot {
        time: 0.0,
        our_team: TeamSide::Blue,
        object,
        object_kind: kind,
        vehicles,
        trajectory: ObjectTrajectory::extrapolate(0.0, &object, TRAJECTORY_HORIZON, TRAJECTORY_DT),
    }
}

/// The fixed scenario catalog. Vehicle 1 is always the bot under test.
pub fn catalog() -> Vec<Scenario> {
    use Action::*;
    use ObjectKind::*;

    vec![
        Scenario {
            id: "2v2_attack_first_man",
            description: "Bot is the fastest challenger in 2v2 and takes the first-man attack.",
            bot: VehicleId::new(1),
            world: snapshot(
                Ball,
                [0.0, 1200.0, 95.0],
                [0.0, 400.0],
                vec![
                    car(1, 0, -200.0, 100.0, 300.0, 700.0, 44.0),
                    car(2, 0, -1800.0, -900.0, 100.0, 350.0, 52.0).human(),
                    car(21, 1, 900.0, 1600.0, 0.0, -300.0, 35.0),
                    car(22, 1, -700.0, 2100.0, 0.0, -200.0, 62.0),
                ],
            ),
            expectation: Expectation::new(Attack, Some(0)),
            tags: &["2v2", "offense"],
        },
        Scenario {
            id: "2v2_support_second_man",
            description: "Bot is second man and supports behind its first-man teammate.",
            bot: VehicleId::new(1),
            world: snapshot(
                Ball,
                [300.0, 1700.0, 100.0],
                [-150.0, 250.0],
                vec![
                    car(1, 0, -1200.0, 200.0, 200.0, 500.0, 58.0),
                    car(2, 0, 200.0, 900.0, 350.0, 850.0, 41.0).human(),
                    car(21, 1, 800.0, 1500.0, 0.0, -500.0, 28.0),
                    car(22, 1, -900.0, 2200.0, 50.0, -400.0, 36.0),
                ],
            ),
            expectation: Expectation::new(Support, Some(1)).max_risk(0.85),
            tags: &["2v2", "support"],
        },
        Scenario {
            id: "2v2_safe_boost_detour",
            description: "Low boost second man refuels while both opponents are caught upfield.",
            bot: VehicleId::new(1),
            world: snapshot(
                Ball,
                [-400.0, 2300.0, 93.0],
                [0.0, 120.0],
                vec![
                    car(1, 0, -1300.0, 1800.0, -150.0, -350.0, 6.0),
                    car(2, 0, -300.0, 3400.0, 0.0, -800.0, 12.0).human(),
                    car(21, 1, 2400.0, -600.0, 300.0, 150.0, 50.0),
                    car(22, 1, -3000.0, -800.0, -300.0, -600.0, 47.0),
                ],
            ),
            expectation: Expectation::new(Boost, Some(1)),
            tags: &["2v2", "boost"],
        },
        Scenario {
            id: "3v3_last_man_defend",
            description: "Bot is third man behind a teammate's challenge and must defend.",
            bot: VehicleId::new(1),
            world: snapshot(
                Ball,
                [200.0, -2800.0, 120.0],
                [120.0, -900.0],
                vec![
                    car(1, 0, -300.0, -4200.0, 200.0, 150.0, 36.0),
                    car(2, 0, 500.0, -900.0, 450.0, 800.0, 52.0).human(),
                    car(3, 0, -400.0, -3800.0, 350.0, 700.0, 61.0),
                    car(21, 1, -200.0, -2500.0, 100.0, -1400.0, 48.0),
                    car(22, 1, 900.0, -1700.0, -100.0, -700.0, 59.0),
                    car(23, 1, -1200.0, -1200.0, 0.0, -750.0, 63.0),
                ],
            ),
            expectation: Expectation::new(Defend, Some(2)),
            tags: &["3v3", "last_man"],
        },
        Scenario {
            id: "3v3_second_man_support",
            description: "Bot is second man in a balanced 3v3 and supports.",
            bot: VehicleId::new(1),
            world: snapshot(
                Ball,
                [400.0, 700.0, 110.0],
                [0.0, 600.0],
                vec![
                    car(1, 0, -500.0, -600.0, 350.0, 650.0, 42.0),
                    car(2, 0, 100.0, 300.0, 450.0, 900.0, 48.0).human(),
                    car(3, 0, -1100.0, -2600.0, 200.0, 320.0, 70.0),
                    car(21, 1, 700.0, 1200.0, -150.0, -650.0, 45.0),
                    car(22, 1, -600.0, 1800.0, 100.0, -500.0, 55.0),
                    car(23, 1, 1000.0, 2200.0, -50.0, -400.0, 49.0),
                ],
            ),
            expectation: Expectation::new(Support, Some(1)).max_risk(0.90),
            tags: &["3v3", "rotation"],
        },
        Scenario {
            id: "3v3_emergency_clear",
            description: "High danger and a close intercept force a defensive action.",
            bot: VehicleId::new(1),
            world: snapshot(
                Ball,
                [-300.0, -3200.0, 90.0],
                [20.0, -1000.0],
                vec![
                    car(1, 0, -700.0, -2700.0, 350.0, -350.0, 52.0),
                    car(2, 0, 600.0, -1400.0, 350.0, 400.0, 46.0).human(),
                    car(3, 0, -1200.0, -4300.0, 100.0, 180.0, 62.0),
                    car(21, 1, -200.0, -2800.0, 0.0, -700.0, 54.0),
                    car(22, 1, 900.0, -2500.0, -100.0, -650.0, 58.0),
                    car(23, 1, -900.0, -2300.0, 40.0, -600.0, 45.0),
                ],
            ),
            expectation: Expectation::new(Defend, None).max_risk(0.95),
            tags: &["3v3", "defense"],
        },
        Scenario {
            id: "3v3_anti_double_commit_support",
            description: "Bot holds back when the attacker has a similar intercept time.",
            bot: VehicleId::new(1),
            world: snapshot(
                Ball,
                [0.0, 1400.0, 100.0],
                [0.0, 100.0],
                vec![
                    car(1, 0, -200.0, 300.0, 350.0, 650.0, 38.0),
                    car(2, 0, 100.0, 520.0, 340.0, 700.0, 41.0).human(),
                    car(3, 0, -800.0, -2100.0, 250.0, 350.0, 59.0),
                    car(21, 1, 400.0, 1700.0, 0.0, -450.0, 60.0),
                    car(22, 1, -500.0, 1900.0, 50.0, -420.0, 52.0),
                    car(23, 1, 1200.0, 2200.0, 0.0, -380.0, 49.0),
                ],
            ),
            expectation: Expectation::new(Support, Some(1)),
            tags: &["3v3", "anti_double_commit"],
        },
        Scenario {
            id: "2v2_human_follow_balance",
            description: "Human teammate pushes first and the bot fills the support lane.",
            bot: VehicleId::new(1),
            world: snapshot(
                Ball,
                [350.0, 1850.0, 95.0],
                [20.0, 300.0],
                vec![
                    car(1, 0, -1400.0, 0.0, 200.0, 430.0, 47.0),
                    car(2, 0, 120.0, 980.0, 520.0, 880.0, 43.0).human(),
                    car(21, 1, 700.0, 1700.0, 0.0, -450.0, 41.0),
                    car(22, 1, -800.0, 2000.0, 30.0, -300.0, 38.0),
                ],
            ),
            expectation: Expectation::new(Support, Some(1)),
            tags: &["2v2", "human_follow"],
        },
        Scenario {
            id: "puck_kickoff_lane_attack",
            description: "Puck kickoff where the bot still challenges as first man.",
            bot: VehicleId::new(1),
            world: snapshot(
                Puck,
                [0.0, 0.0, 60.0],
                [0.0, 0.0],
                vec![
                    car(1, 0, 0.0, -1900.0, 0.0, 1150.0, 34.0),
                    car(2, 0, -2300.0, -2600.0, 0.0, 900.0, 50.0).human(),
                    car(21, 1, 0.0, 1900.0, 0.0, -1050.0, 37.0),
                    car(22, 1, 2300.0, 2600.0, 0.0, -900.0, 55.0),
                ],
            ),
            expectation: Expectation::new(Attack, Some(0)),
            tags: &["puck", "kickoff"],
        },
        Scenario {
            id: "puck_corner_support",
            description: "Puck in the corner with a teammate close; the bot supports.",
            bot: VehicleId::new(1),
            world: snapshot(
                Puck,
                [3400.0, 2600.0, 65.0],
                [-500.0, 120.0],
                vec![
                    car(1, 0, 1400.0, 1200.0, 250.0, 500.0, 33.0),
                    car(2, 0, 2700.0, 2300.0, 450.0, 550.0, 40.0).human(),
                    car(21, 1, 3100.0, 2400.0, -300.0, -250.0, 48.0),
                    car(22, 1, 1500.0, 1800.0, 0.0, -350.0, 42.0),
                ],
            ),
            expectation: Expectation::new(Support, Some(1)),
            tags: &["puck", "support"],
        },
        Scenario {
            id: "puck_last_man_hold",
            description: "Puck transition where a teammate challenges and the bot holds last back.",
            bot: VehicleId::new(1),
            world: snapshot(
                Puck,
                [-200.0, -2500.0, 62.0],
                [100.0, -750.0],
                vec![
                    car(1, 0, -700.0, -4200.0, 200.0, 200.0, 45.0),
                    car(2, 0, 500.0, -1200.0, 420.0, 620.0, 52.0).human(),
                    car(3, 0, -800.0, -3800.0, 300.0, 560.0, 48.0),
                    car(21, 1, 300.0, -2300.0, -50.0, -1250.0, 59.0),
                    car(22, 1, -600.0, -1700.0, 0.0, -700.0, 54.0),
                    car(23, 1, 900.0, -1500.0, -80.0, -640.0, 46.0),
                ],
            ),
            expectation: Expectation::new(Defend, Some(2)),
            tags: &["puck", "3v3", "last_man"],
        },
        Scenario {
            id: "puck_safe_boost_window",
            description: "Low boost support bot in puck mode takes a safe boost detour.",
            bot: VehicleId::new(1),
            world: snapshot(
                Puck,
                [200.0, 2100.0, 60.0],
                [-80.0, 160.0],
                vec![
                    car(1, 0, -1500.0, 1000.0, 300.0, 500.0, 5.0),
                    car(2, 0, 0.0, 3600.0, 300.0, -650.0, 12.0).human(),
                    car(21, 1, 2000.0, -1200.0, 300.0, -300.0, 49.0),
                    car(22, 1, -3200.0, 4300.0, -500.0, -1100.0, 51.0),
                ],
            ),
            expectation: Expectation::new(Boost, Some(1)),
            tags: &["puck", "boost"],
        },
    ]
}
