use penguin_academy::academy::{FEED_RADIUS, FISH_SPEED};
use penguin_academy::telemetry::init_tracing;
use penguin_academy::{Academy, AcademyConfig, CurriculumParameterStore, HostEvent};
use tokio::sync::mpsc;

// Stand-in for the Python trainer: pushes a few parameter changes between ticks.
async fn scripted_trainer(tx: mpsc::Sender<HostEvent>) {
    let script = [
        (FISH_SPEED, 0.5),
        (FEED_RADIUS, 4.0),
        (FISH_SPEED, 1.0),
        (FEED_RADIUS, 2.0),
    ];

    for (key, value) in script {
        let set = HostEvent::SetProperty {
            key: key.to_string(),
            value,
        };
        if tx.send(set).await.is_err() {
            return;
        }
        for _ in 0..5 {
            if tx.send(HostEvent::Step).await.is_err() {
                return;
            }
        }
    }
    let _ = tx.send(HostEvent::Shutdown).await;
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = match std::env::args().nth(1) {
        Some(path) => AcademyConfig::from_path(path)?,
        None => AcademyConfig::default(),
    };
    init_tracing(&config.log_filter);

    let mut academy = Academy::new(config)?;
    let store = CurriculumParameterStore::initialize(&mut academy)?;

    let (tx, mut rx) = mpsc::channel(8);
    let trainer = tokio::spawn(scripted_trainer(tx));

    let report = academy.run(&mut rx).await?;
    // Unblock the trainer if max_steps cut the run short.
    drop(rx);
    trainer.await?;

    println!(
        "ran {} steps (limit {:?}), {} parameter messages; final {:?}",
        report.steps,
        academy.config().max_steps,
        report.messages,
        store
    );
    Ok(())
}
