use anyhow::Result;
use result_processor::{
    error::{ProcessError, TransportError},
    worker::Disposition,
};

fn transport_failure() -> ProcessError {
    ProcessError::Transport(TransportError::Status {
        method: "POST".to_string(),
        url: "http://localhost/email".to_string(),
        status: 503,
        body: String::new(),
        retry_after: None,
    })
}

/// Test: Successful processing acknowledges the delivery
#[tokio::test]
async fn test_success_is_acknowledged() -> Result<()> {
    assert_eq!(Disposition::for_outcome(&Ok(()), false), Disposition::Ack);
    assert_eq!(Disposition::for_outcome(&Ok(()), true), Disposition::Ack);

    Ok(())
}

/// Test: Transient failures get one redelivery before dead-lettering
#[tokio::test]
async fn test_transient_failure_is_requeued_once() -> Result<()> {
    assert_eq!(
        Disposition::for_outcome(&Err(transport_failure()), false),
        Disposition::Requeue
    );
    assert_eq!(
        Disposition::for_outcome(&Err(transport_failure()), true),
        Disposition::DeadLetter
    );

    Ok(())
}

/// Test: Invalid messages go straight to the failed queue
#[tokio::test]
async fn test_validation_failure_is_dead_lettered() -> Result<()> {
    let outcome = Err(ProcessError::Validation(Vec::new()));

    assert_eq!(
        Disposition::for_outcome(&outcome, false),
        Disposition::DeadLetter
    );

    Ok(())
}
