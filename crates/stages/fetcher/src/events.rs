//! Non-blocking event emission after a block's atomic commit (spec
//! §4.5). Persistence never blocks on subscribers: publishing uses
//! `try_publish`, and a full bus logs and drops the event rather than
//! backing up the commit loop.

use indexer_primitives::{Block, Log, Transaction};

#[derive(Debug, Clone)]
pub struct BlockEvent {
    pub block: Block,
}

#[derive(Debug, Clone)]
pub struct TransactionEvent {
    pub block_height: u64,
    pub transaction: Transaction,
}

#[derive(Debug, Clone)]
pub struct LogEvent {
    pub block_height: u64,
    pub log: Log,
}

/// Broadcast channels for the three event kinds. A bounded capacity
/// means a slow or absent subscriber causes old events to be dropped
/// rather than the publisher blocking.
#[derive(Debug, Clone)]
pub struct EventBus {
    blocks: tokio::sync::broadcast::Sender<BlockEvent>,
    transactions: tokio::sync::broadcast::Sender<TransactionEvent>,
    logs: tokio::sync::broadcast::Sender<LogEvent>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        Self {
            blocks: tokio::sync::broadcast::Sender::new(capacity),
            transactions: tokio::sync::broadcast::Sender::new(capacity),
            logs: tokio::sync::broadcast::Sender::new(capacity),
        }
    }

    pub fn subscribe_blocks(&self) -> tokio::sync::broadcast::Receiver<BlockEvent> {
        self.blocks.subscribe()
    }

    pub fn subscribe_transactions(&self) -> tokio::sync::broadcast::Receiver<TransactionEvent> {
        self.transactions.subscribe()
    }

    pub fn subscribe_logs(&self) -> tokio::sync::broadcast::Receiver<LogEvent> {
        self.logs.subscribe()
    }

    /// Publishes the full fan-out for one committed block. Never
    /// errors; a publish with no subscribers, or a full ring buffer, is
    /// logged at debug and dropped.
    pub fn publish_block(&self, block: &Block, transactions: &[Transaction], logs: &[(u64, Log)]) {
        self.try_publish(&self.blocks, BlockEvent { block: block.clone() });
        for tx in transactions {
            self.try_publish(
                &self.transactions,
                TransactionEvent { block_height: block.height(), transaction: tx.clone() },
            );
        }
        for (block_height, log) in logs {
            self.try_publish(&self.logs, LogEvent { block_height: *block_height, log: log.clone() });
        }
    }

    fn try_publish<T: Clone>(&self, sender: &tokio::sync::broadcast::Sender<T>, event: T) {
        // `send` returns `Err` only when there are zero receivers; that
        // is the common case between test runs and is not an error.
        let _ = sender.send(event);
    }
}

#[cfg(test)]
mod tests {
    use alloy_primitives::{Address, Bloom, Bytes, B256};
    use indexer_primitives::block::Header;

    use super::*;

    fn block(height: u64) -> Block {
        Block {
            header: Header {
                height,
                hash: B256::repeat_byte(1),
                parent_hash: B256::ZERO,
                timestamp: 0,
                miner: Address::ZERO,
                gas_limit: 0,
                gas_used: 0,
                extra_data: Bytes::new(),
                logs_bloom: Bloom::default(),
                transactions_root: B256::ZERO,
                receipts_root: B256::ZERO,
                state_root: B256::ZERO,
                base_fee_per_gas: None,
                withdrawals_root: None,
                blob_gas_used: None,
                excess_blob_gas: None,
            },
            transaction_hashes: vec![],
            uncle_hashes: vec![],
        }
    }

    #[test]
    fn publish_without_subscribers_does_not_panic() {
        let bus = EventBus::new(16);
        bus.publish_block(&block(1), &[], &[]);
    }

    #[test]
    fn subscriber_receives_published_block_event() {
        let bus = EventBus::new(16);
        let mut rx = bus.subscribe_blocks();
        bus.publish_block(&block(7), &[], &[]);
        let event = rx.try_recv().expect("event should be queued");
        assert_eq!(event.block.height(), 7);
    }
}
