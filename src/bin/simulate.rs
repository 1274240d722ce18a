use brawler_core::config::FighterConfig;
use brawler_core::constants::{OFFSCREEN_MARGIN, PLAYFIELD_WIDTH};
use brawler_core::engine::SimEngine;
use brawler_core::level::Level;
use brawler_core::types::{GameOverReason, InputFrame, RuntimeEvent, Snapshot};
use clap::Parser;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use serde_json::{json, Value};
use std::collections::{BTreeMap, HashSet};
use std::io;
use std::path::Path;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    #[arg(long)]
    single: bool,
    #[arg(long)]
    level: Option<u32>,
    #[arg(long)]
    script: Option<String>,
    #[arg(long)]
    ticks: Option<u32>,
    #[arg(long)]
    fps: Option<u32>,
    #[arg(long)]
    seed: Option<u64>,
    #[arg(long)]
    run_id: Option<String>,
    #[arg(long)]
    summary_out: Option<PathBuf>,
}

/// Canned pilot for the fighter. Everything the harness feeds the engine
/// comes from here, so a script name plus a seed replays exactly.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
enum InputScript {
    Idle,
    RushRight,
    Brawl,
    Random,
}

impl InputScript {
    fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "idle" => Some(Self::Idle),
            "rush" | "rush_right" => Some(Self::RushRight),
            "brawl" => Some(Self::Brawl),
            "random" => Some(Self::Random),
            _ => None,
        }
    }
}

struct ScriptPlayer {
    script: InputScript,
    rng: StdRng,
    walking: InputFrame,
}

impl ScriptPlayer {
    fn new(script: InputScript, seed: u32) -> Self {
        Self {
            script,
            rng: StdRng::seed_from_u64(seed as u64),
            walking: InputFrame {
                right: true,
                ..Default::default()
            },
        }
    }

    fn frame(&mut self, tick: u32) -> InputFrame {
        match self.script {
            InputScript::Idle => InputFrame::default(),
            InputScript::RushRight => InputFrame {
                right: true,
                jump_pressed: tick % 90 == 0,
                attack_pressed: tick % 45 == 0,
                ..Default::default()
            },
            InputScript::Brawl => {
                // Sweep the stage in four-second passes, swinging on the move.
                let heading_right = (tick / 240) % 2 == 0;
                InputFrame {
                    right: heading_right,
                    left: !heading_right,
                    jump_pressed: tick % 150 == 0,
                    attack_pressed: tick % 30 == 0,
                    down: tick % 240 == 239,
                    ..Default::default()
                }
            }
            InputScript::Random => {
                if self.rng.random_bool(0.02) {
                    std::mem::swap(&mut self.walking.left, &mut self.walking.right);
                }
                InputFrame {
                    left: self.walking.left,
                    right: self.walking.right,
                    down: self.rng.random_bool(0.01),
                    jump_pressed: self.rng.random_bool(0.02),
                    attack_pressed: self.rng.random_bool(0.05),
                }
            }
        }
    }
}

#[derive(Clone, Debug, Serialize)]
struct Scenario {
    name: String,
    level: u32,
    script: InputScript,
    ticks: u32,
    fps: u32,
    seed: u32,
}

#[derive(Clone, Debug, Serialize)]
struct ScenarioResultLine {
    scenario: String,
    seed: u32,
    level: u32,
    script: InputScript,
    reason: Option<GameOverReason>,
    #[serde(rename = "finishedTick")]
    finished_tick: u64,
    #[serde(rename = "simSeconds")]
    sim_seconds: f64,
    #[serde(rename = "livesLeft")]
    lives_left: i32,
    #[serde(rename = "adversariesDefeated")]
    adversaries_defeated: usize,
    #[serde(rename = "adversariesTotal")]
    adversaries_total: usize,
    #[serde(rename = "damageDealt")]
    damage_dealt: f32,
    #[serde(rename = "fighterHits")]
    fighter_hits: i32,
    respawns: i32,
    #[serde(rename = "spearsSpawned")]
    spears_spawned: u32,
    #[serde(rename = "spearsLanded")]
    spears_landed: u32,
    casts: i32,
    anomalies: Vec<String>,
}

#[derive(Clone, Debug, Serialize)]
struct AnomalyRecord {
    tick: u64,
    message: String,
}

#[derive(Clone, Debug, Serialize)]
struct ScenarioRunResult {
    #[serde(flatten)]
    result: ScenarioResultLine,
    #[serde(rename = "anomalyRecords")]
    anomaly_records: Vec<AnomalyRecord>,
}

#[derive(Clone, Debug, Serialize)]
struct RunSummary {
    #[serde(rename = "runId")]
    run_id: String,
    #[serde(rename = "startedAtMs")]
    started_at_ms: u64,
    #[serde(rename = "finishedAtMs")]
    finished_at_ms: u64,
    #[serde(rename = "scenarioCount")]
    scenario_count: usize,
    #[serde(rename = "anomalyCount")]
    anomaly_count: usize,
    #[serde(rename = "averageTicks")]
    average_ticks: u64,
    #[serde(rename = "reasonCounts")]
    reason_counts: BTreeMap<String, usize>,
    scenarios: Vec<ScenarioResultLine>,
}

#[derive(Clone, Debug, Serialize)]
struct StructuredLogLine {
    #[serde(rename = "timestampMs")]
    timestamp_ms: u64,
    level: String,
    event: String,
    #[serde(rename = "runId")]
    run_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    scenario: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    seed: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tick: Option<u64>,
    details: Value,
}

fn main() {
    let cli = Cli::parse();
    let scenarios = resolve_scenarios(&cli);
    let run_started_at_ms = now_ms();
    let seed_hint = scenarios.first().map(|scenario| scenario.seed).unwrap_or(0);
    let run_id = cli
        .run_id
        .clone()
        .unwrap_or_else(|| default_run_id(seed_hint, run_started_at_ms));
    let mut has_anomaly = false;
    let mut scenario_results = Vec::new();
    let mut reason_counts: BTreeMap<String, usize> = BTreeMap::new();
    let mut total_ticks = 0u64;
    let mut total_anomalies = 0usize;

    for scenario in scenarios {
        emit_log(
            "info",
            "scenario_started",
            &run_id,
            Some(&scenario.name),
            Some(scenario.seed),
            None,
            json!({
                "level": scenario.level,
                "script": scenario.script,
                "ticks": scenario.ticks,
                "fps": scenario.fps,
            }),
        );
        let scenario_run = run_scenario(&scenario);

        for anomaly in &scenario_run.anomaly_records {
            emit_log(
                "warn",
                "anomaly_detected",
                &run_id,
                Some(&scenario.name),
                Some(scenario.seed),
                Some(anomaly.tick),
                json!({
                    "message": anomaly.message,
                }),
            );
        }

        if !scenario_run.result.anomalies.is_empty() {
            has_anomaly = true;
        }
        total_anomalies += scenario_run.anomaly_records.len();
        total_ticks += scenario_run.result.finished_tick;
        *reason_counts
            .entry(game_over_reason_key(scenario_run.result.reason))
            .or_insert(0) += 1;

        emit_log(
            "info",
            "scenario_finished",
            &run_id,
            Some(&scenario.name),
            Some(scenario.seed),
            Some(scenario_run.result.finished_tick),
            json!({
                "reason": scenario_run.result.reason,
                "simSeconds": scenario_run.result.sim_seconds,
                "livesLeft": scenario_run.result.lives_left,
                "adversariesDefeated": scenario_run.result.adversaries_defeated,
                "anomalyCount": scenario_run.anomaly_records.len(),
            }),
        );

        println!(
            "{}",
            serde_json::to_string(&scenario_run.result).expect("scenario result should serialize")
        );
        scenario_results.push(scenario_run.result);
    }

    let run_finished_at_ms = now_ms();
    let summary = build_run_summary(
        run_id.clone(),
        run_started_at_ms,
        run_finished_at_ms,
        scenario_results.clone(),
        reason_counts,
        total_anomalies,
        total_ticks,
    );

    let mut summary_out_written: Option<String> = None;
    if let Some(path) = cli.summary_out.as_ref() {
        if let Err(error) = write_summary(path, &summary) {
            emit_log(
                "error",
                "summary_write_failed",
                &run_id,
                None,
                None,
                None,
                json!({
                    "path": path.to_string_lossy(),
                    "error": error.to_string(),
                }),
            );
            std::process::exit(2);
        }
        summary_out_written = Some(path.to_string_lossy().to_string());
    }

    emit_log(
        "info",
        "run_finished",
        &run_id,
        None,
        None,
        None,
        json!({
            "scenarioCount": summary.scenario_count,
            "anomalyCount": summary.anomaly_count,
            "averageTicks": summary.average_ticks,
            "reasonCounts": summary.reason_counts,
            "summaryOut": summary_out_written,
        }),
    );

    if has_anomaly {
        std::process::exit(1);
    }
}

fn run_scenario(scenario: &Scenario) -> ScenarioRunResult {
    let level = Level::by_number(scenario.level).unwrap_or_else(Level::level_one);
    let mut engine = SimEngine::new(level, scenario.seed);
    let mut player = ScriptPlayer::new(scenario.script, scenario.seed);
    let dt = 1.0 / scenario.fps.max(1) as f32;

    let mut fighter_hits = 0;
    let mut respawns = 0;
    let mut casts = 0;
    let mut anomalies = Vec::new();
    let mut anomaly_records = Vec::new();
    let mut anomaly_seen = HashSet::new();
    let mut last_lives = i32::MAX;

    for tick in 0..scenario.ticks {
        if engine.is_ended() {
            break;
        }
        engine.step(dt, player.frame(tick));
        let snapshot = engine.build_snapshot(true);
        for message in collect_snapshot_anomalies(&snapshot) {
            push_anomaly(
                &mut anomalies,
                &mut anomaly_records,
                &mut anomaly_seen,
                snapshot.tick,
                message,
            );
        }
        if snapshot.fighter.lives > last_lives {
            push_anomaly(
                &mut anomalies,
                &mut anomaly_records,
                &mut anomaly_seen,
                snapshot.tick,
                format!(
                    "lives went up: {} -> {}",
                    last_lives, snapshot.fighter.lives
                ),
            );
        }
        last_lives = snapshot.fighter.lives;

        for event in &snapshot.events {
            match event {
                RuntimeEvent::FighterHit { .. } | RuntimeEvent::SpearHit { .. } => {
                    fighter_hits += 1
                }
                RuntimeEvent::FighterRespawned { .. } => respawns += 1,
                RuntimeEvent::CastStarted { .. } => casts += 1,
                _ => {}
            }
        }
    }

    let summary = engine.build_summary();
    ScenarioRunResult {
        result: ScenarioResultLine {
            scenario: scenario.name.clone(),
            seed: scenario.seed,
            level: scenario.level,
            script: scenario.script,
            reason: summary.reason,
            finished_tick: summary.ticks,
            sim_seconds: summary.duration,
            lives_left: summary.lives_left,
            adversaries_defeated: summary.adversaries_defeated,
            adversaries_total: summary.adversaries_total,
            damage_dealt: summary.damage_dealt,
            fighter_hits,
            respawns,
            spears_spawned: summary.spears_spawned,
            spears_landed: summary.spears_landed,
            casts,
            anomalies,
        },
        anomaly_records,
    }
}

fn collect_snapshot_anomalies(snapshot: &Snapshot) -> Vec<String> {
    let mut anomalies = Vec::new();
    if !snapshot.now.is_finite() || snapshot.now < 0.0 {
        anomalies.push(format!("invalid clock: {}", snapshot.now));
    }

    let fighter = &snapshot.fighter;
    let max_lives = FighterConfig::standard().lives;
    if fighter.lives < 0 || fighter.lives > max_lives {
        anomalies.push(format!("fighter lives out of range: {}", fighter.lives));
    }
    if !fighter.hitbox.x.is_finite() || !fighter.hitbox.y.is_finite() {
        anomalies.push("fighter position is not finite".to_string());
    }
    if fighter.invincibility < 0.0 {
        anomalies.push(format!(
            "negative invincibility: {}",
            fighter.invincibility
        ));
    }
    if fighter.elapsed_in_state < 0.0 {
        anomalies.push(format!(
            "fighter state clock ran backward: {}",
            fighter.elapsed_in_state
        ));
    }

    for adversary in &snapshot.adversaries {
        if !adversary.health.is_finite()
            || adversary.health < 0.0
            || adversary.health > adversary.max_health
        {
            anomalies.push(format!(
                "adversary health out of range: {:?} {}/{}",
                adversary.kind, adversary.health, adversary.max_health
            ));
        }
        if adversary.dead && !adversary.dying {
            anomalies.push(format!(
                "adversary dead without dying: {:?}",
                adversary.kind
            ));
        }
    }

    for spear in &snapshot.spears {
        let rect = spear.rect;
        if rect.right() < -OFFSCREEN_MARGIN || rect.x > PLAYFIELD_WIDTH + OFFSCREEN_MARGIN {
            anomalies.push(format!("spear escaped the playfield: x {}", rect.x));
        }
    }

    if snapshot.adversaries.is_empty() {
        anomalies.push("level spawned no adversaries".to_string());
    }
    anomalies
}

fn resolve_scenarios(cli: &Cli) -> Vec<Scenario> {
    let seed = normalize_seed(cli.seed.unwrap_or_else(|| {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64
    }));
    let script = cli
        .script
        .as_deref()
        .and_then(InputScript::parse)
        .unwrap_or(InputScript::Brawl);
    let fps = clamp_u32(cli.fps.unwrap_or(60), 10, 240);

    if cli.single || cli.level.is_some() || cli.ticks.is_some() || cli.script.is_some() {
        let level = clamp_u32(cli.level.unwrap_or(1), 1, 2);
        return vec![Scenario {
            name: format!("custom-l{level}"),
            level,
            script,
            ticks: clamp_u32(cli.ticks.unwrap_or(3600), 1, 216_000),
            fps,
            seed,
        }];
    }

    vec![
        Scenario {
            name: "rush-check-l1".to_string(),
            level: 1,
            script: InputScript::RushRight,
            ticks: 1800,
            fps,
            seed,
        },
        Scenario {
            name: "brawl-check-l2".to_string(),
            level: 2,
            script: InputScript::Brawl,
            ticks: 3600,
            fps,
            seed: normalize_seed(seed as u64 + 1),
        },
    ]
}

fn clamp_u32(value: u32, min: u32, max: u32) -> u32 {
    value.clamp(min, max)
}

fn normalize_seed(seed: u64) -> u32 {
    seed as u32
}

fn push_anomaly(
    anomalies: &mut Vec<String>,
    anomaly_records: &mut Vec<AnomalyRecord>,
    anomaly_seen: &mut HashSet<String>,
    tick: u64,
    message: String,
) {
    anomaly_records.push(AnomalyRecord {
        tick,
        message: message.clone(),
    });
    if anomaly_seen.insert(message.clone()) {
        anomalies.push(message);
    }
}

fn default_run_id(seed: u32, timestamp_ms: u64) -> String {
    format!("sim-{seed}-{timestamp_ms}")
}

fn build_run_summary(
    run_id: String,
    started_at_ms: u64,
    finished_at_ms: u64,
    scenarios: Vec<ScenarioResultLine>,
    reason_counts: BTreeMap<String, usize>,
    anomaly_count: usize,
    total_ticks: u64,
) -> RunSummary {
    let scenario_count = scenarios.len();
    let average_ticks = if scenario_count == 0 {
        0
    } else {
        total_ticks / scenario_count as u64
    };
    RunSummary {
        run_id,
        started_at_ms,
        finished_at_ms,
        scenario_count,
        anomaly_count,
        average_ticks,
        reason_counts,
        scenarios,
    }
}

fn emit_log(
    level: &str,
    event: &str,
    run_id: &str,
    scenario: Option<&str>,
    seed: Option<u32>,
    tick: Option<u64>,
    details: Value,
) {
    let log_line = StructuredLogLine {
        timestamp_ms: now_ms(),
        level: level.to_string(),
        event: event.to_string(),
        run_id: run_id.to_string(),
        scenario: scenario.map(|value| value.to_string()),
        seed,
        tick,
        details,
    };
    eprintln!(
        "{}",
        serde_json::to_string(&log_line).expect("structured log should serialize")
    );
}

fn game_over_reason_key(reason: Option<GameOverReason>) -> String {
    match reason {
        Some(GameOverReason::Cleared) => "cleared",
        Some(GameOverReason::Defeated) => "defeated",
        None => "unfinished",
    }
    .to_string()
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

fn write_summary(path: &Path, summary: &RunSummary) -> io::Result<()> {
    let summary_text = serde_json::to_string_pretty(summary).expect("run summary should serialize");
    std::fs::write(path, summary_text)
}
