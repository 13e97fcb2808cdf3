//! Thread pool of tree-sitter Java parsers
//!
//! Tree-sitter parsers are not `Sync`, so each worker thread owns one parser
//! and receives requests over a shared channel. Independent revisions can be
//! parsed in parallel this way; recording their histories stays sequential.

use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};

use anyhow::Result;
use tree_sitter::Parser;

use crate::compilation::{JavaCompilation, java_language};

/// A parsing request sent to the parser pool
#[derive(Debug)]
pub struct ParseRequest {
    pub content: String,
    pub path: PathBuf,
}

/// Result of a parsing operation
#[derive(Debug)]
pub struct ParseResult {
    pub tree: tree_sitter::Tree,
    pub path: PathBuf,
    pub content: String,
}

impl ParseResult {
    pub fn into_compilation(self) -> JavaCompilation {
        JavaCompilation::from_parts(self.content, self.tree)
    }
}

/// Internal message for the parser worker
#[derive(Debug)]
struct WorkerRequest {
    request: ParseRequest,
    response_sender: Sender<Result<ParseResult>>,
}

/// Thread-safe parser pool
pub struct ParserPool {
    sender: Sender<WorkerRequest>,
}

impl ParserPool {
    /// Create a new parser pool with the specified number of worker threads
    pub fn new(num_workers: usize) -> Self {
        let (sender, receiver) = mpsc::channel::<WorkerRequest>();
        let receiver = Arc::new(Mutex::new(receiver));

        for i in 0..num_workers.max(1) {
            let receiver = Arc::clone(&receiver);
            std::thread::spawn(move || {
                Self::worker_thread(i, receiver);
            });
        }

        Self { sender }
    }

    /// Worker thread function that processes parsing requests
    fn worker_thread(worker_id: usize, receiver: Arc<Mutex<Receiver<WorkerRequest>>>) {
        tracing::debug!("Parser worker {} started", worker_id);

        let mut parser = Parser::new();
        if let Err(e) = parser.set_language(&java_language()) {
            tracing::warn!("Parser worker {} could not load the Java grammar: {}", worker_id, e);
            return;
        }

        loop {
            let next = match receiver.lock() {
                Ok(guard) => guard.recv(),
                Err(_) => {
                    tracing::warn!("Parser worker {} found the request queue poisoned", worker_id);
                    break;
                }
            };
            let WorkerRequest { request, response_sender } = match next {
                Ok(req) => req,
                Err(_) => {
                    tracing::debug!("Parser worker {} shutting down", worker_id);
                    break;
                }
            };

            let result = match parser.parse(&request.content, None) {
                Some(tree) => Ok(ParseResult {
                    tree,
                    path: request.path,
                    content: request.content,
                }),
                None => Err(anyhow::anyhow!("Failed to parse {}", request.path.display())),
            };

            if response_sender.send(result).is_err() {
                tracing::warn!("Failed to send parse result back to caller");
            }
        }
    }

    fn submit(&self, request: ParseRequest) -> Result<Receiver<Result<ParseResult>>> {
        let (response_sender, response_receiver) = mpsc::channel();
        self.sender
            .send(WorkerRequest { request, response_sender })
            .map_err(|_| anyhow::anyhow!("Parser pool is shut down"))?;
        Ok(response_receiver)
    }

    /// Parse content synchronously using the parser pool
    /// Note: This blocks the current thread until parsing is complete
    pub fn parse_blocking(&self, request: ParseRequest) -> Result<ParseResult> {
        let response_receiver = self.submit(request)?;
        response_receiver
            .recv()
            .map_err(|_| anyhow::anyhow!("Parser worker died"))?
    }

    /// Queue every request before waiting, so workers parse them in parallel.
    /// Results come back in request order.
    pub fn parse_all(&self, requests: Vec<ParseRequest>) -> Vec<Result<ParseResult>> {
        let pending: Vec<_> = requests.into_iter().map(|r| self.submit(r)).collect();
        pending
            .into_iter()
            .map(|receiver| -> Result<ParseResult> {
                receiver?
                    .recv()
                    .map_err(|_| anyhow::anyhow!("Parser worker died"))?
            })
            .collect()
    }
}

impl Clone for ParserPool {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

/// Convenience function to create a parser pool, sized from `workers` or
/// the number of CPU cores (at least 2)
pub fn create_parser_pool(workers: Option<usize>) -> ParserPool {
    let num_workers = workers.unwrap_or_else(|| {
        std::thread::available_parallelism()
            .map(|n| n.get().max(2))
            .unwrap_or(2)
    });

    ParserPool::new(num_workers)
}
