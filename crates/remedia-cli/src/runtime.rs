// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use remedia_app::{Outcome, PredictRequest, RequestId};
use remedia_client::Client;
use remedia_tui::InternalEvent;
use std::sync::mpsc::Sender;
use std::thread;

pub struct HttpRuntime {
    client: Client,
}

impl HttpRuntime {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

impl remedia_tui::AppRuntime for HttpRuntime {
    fn predict(&mut self, request: &PredictRequest) -> Outcome {
        self.client.dispatch(request)
    }

    fn spawn_prediction(
        &mut self,
        request_id: RequestId,
        request: PredictRequest,
        tx: Sender<InternalEvent>,
    ) -> Result<()> {
        let client = self.client.clone();
        thread::Builder::new()
            .name(format!("predict-{}", request_id.get()))
            .spawn(move || {
                let outcome = client.dispatch(&request);
                // The UI may have exited; a closed channel is not an error here.
                let _ = tx.send(InternalEvent::Prediction {
                    request_id,
                    outcome,
                });
            })
            .context("spawn prediction worker")?;
        Ok(())
    }
}
