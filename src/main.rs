use speedgauge::app::{AppState, ProbeSource};
use speedgauge::config::GlobalConfig;
use speedgauge::data_model::settings::{AppSettings, OutputMode};
use speedgauge::logging::{self, LogTarget};
use speedgauge::measurement::SpeedTest;
use speedgauge::probe::MeasurementKind;
use speedgauge::probe_engine::ScriptedProbe;
use speedgauge::report::{self, ReportDocument};
use speedgauge::runtime::{drain_run, spawn_probe_run};
use speedgauge::settings::{apply_global, load_from_cli};
use speedgauge::storage::{self, PersistedState};
use speedgauge::ui::run_ui;
use std::io;
use std::time::Duration;
use tracing::{info, warn};

const SIMULATED_STEP_DELAY: Duration = Duration::from_millis(40);

fn main() -> io::Result<()> {
    let settings = load_from_cli()
        .map_err(|err| io::Error::new(io::ErrorKind::InvalidInput, err.to_string()))?;

    let (persisted, load_error) = match storage::load() {
        Ok(state) => (state, None),
        Err(err) => (PersistedState::default(), Some(err)),
    };
    let mut global = persisted.global_config.clone();
    apply_global(&settings, &mut global);

    let target = if settings.output == OutputMode::Tui && !settings.show_history {
        LogTarget::for_tui(storage::log_dir())
    } else {
        LogTarget::Stderr
    };
    logging::init(&global.log_level, target)?;
    if let Some(err) = load_error {
        warn!("ignoring unreadable state file: {err}");
    }

    if settings.show_history {
        print!("{}", report::render_history(&persisted.history));
        return Ok(());
    }

    let source = if settings.simulate {
        ProbeSource::Simulated(ScriptedProbe::default().with_step_delay(SIMULATED_STEP_DELAY))
    } else {
        ProbeSource::Network
    };

    match settings.output {
        OutputMode::Tui => run_ui(AppState::new(
            persisted,
            global,
            source,
            settings.save_history,
        )),
        OutputMode::Plain | OutputMode::Json => run_headless(persisted, global, source, &settings),
    }
}

fn run_headless(
    mut persisted: PersistedState,
    global: GlobalConfig,
    source: ProbeSource,
    settings: &AppSettings,
) -> io::Result<()> {
    let simulated = source.is_simulated();
    let plan = global.plan.plan();
    let mut test = SpeedTest::new(&plan);
    test.start().map_err(io::Error::other)?;

    let plain = settings.output == OutputMode::Plain;
    if plain {
        println!(
            "Testing against {} ({} plan, {:.0} MB down, {:.0} MB up)",
            global.server,
            global.plan,
            plan.total_bytes(MeasurementKind::Download) as f64 / 1e6,
            plan.total_bytes(MeasurementKind::Upload) as f64 / 1e6,
        );
    }
    let handle = spawn_probe_run(source.into_factory(global.clone()), plan);
    let mut last_line = String::new();
    let outcome = drain_run(&mut test, handle, |test| {
        if !plain {
            return;
        }
        let line = report::progress_line(test);
        if line != last_line {
            println!("{line}");
            last_line = line;
        }
    });

    let result = match outcome {
        Ok(Some(result)) => result,
        Ok(None) => return Err(io::Error::other("probe finished without results")),
        Err(err) => return Err(io::Error::other(format!("speed test failed: {err}"))),
    };

    let doc = ReportDocument::build(&global, &result);
    if plain {
        println!();
        print!("{}", report::render_text(&doc));
    } else {
        let json = report::render_json(&doc).map_err(io::Error::other)?;
        println!("{json}");
    }

    if settings.save_history && simulated {
        info!("simulated result not added to history");
    } else if settings.save_history {
        persisted.record_result(&global, &result);
        if let Err(err) = storage::save(&persisted) {
            warn!("failed to save history: {err}");
        }
    }
    Ok(())
}
