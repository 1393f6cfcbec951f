use skin_capture::camera::SyntheticCamera;
use skin_capture::flow::{CaptureFlow, CaptureFlowBuilder, CaptureOutcome};
use skin_capture::{AppError, Configuration, SessionMode};
use tracing::{info, warn};

const MAX_ATTEMPTS_PER_SLOT: usize = 5;

fn init_logging(configuration: &Configuration) {
    tracing_subscriber::fmt()
        .with_max_level(configuration.tracing_level())
        .init();
}

async fn capture_until_review(flow: &mut CaptureFlow<SyntheticCamera>) -> Result<(), AppError> {
    let mut attempts = 0;
    while flow.session().mode() == SessionMode::Capturing {
        let label = flow.session().active_slot().label();
        info!("{}: {}", label, label.guidance());
        match flow.capture().await? {
            CaptureOutcome::Stored(_) => {
                attempts = 0;
                info!("Progress {}", flow.session().progress());
            }
            CaptureOutcome::Skipped(reason) => {
                attempts += 1;
                warn!("Capture of {} skipped: {:?}", label, reason);
                if attempts >= MAX_ATTEMPTS_PER_SLOT {
                    warn!("Giving up on {} after {} attempts", label, attempts);
                    break;
                }
            }
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    let config_path = std::env::args().nth(1);
    let configuration = Configuration::load(config_path.as_deref())?;
    init_logging(&configuration);
    info!("Starting {:?} capture session", configuration.layout);

    let camera = SyntheticCamera::new(640, 480).with_failure_rate(0.2);
    let mut flow = CaptureFlowBuilder::new(configuration).build(camera);
    flow.request_permission().await?;

    capture_until_review(&mut flow).await?;
    if flow.session().mode() != SessionMode::Reviewing {
        warn!("Camera kept failing, stopping at {}", flow.session().progress());
        return Ok(());
    }

    if flow.session().len() > 1 {
        flow.previous()?;
        info!("Reviewing {}", flow.session().displayed_slot().label());
        flow.request_retake(flow.session().displayed_index())?;
        capture_until_review(&mut flow).await?;
    }

    match flow.analyze().await {
        Ok(report) => info!(
            "Skin type {} at {}% confidence",
            report.skin_type,
            report.confidence_percent()
        ),
        Err(e) => warn!("Analysis unavailable: {}", e),
    }

    println!("{}", serde_json::to_string_pretty(&flow.snapshot())?);
    Ok(())
}
