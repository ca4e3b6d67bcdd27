use mockall::{predicate::eq, Sequence};

use crate::traits::{MockPlatform, Platform};

pub fn expect_command(platform: &mut MockPlatform, seq: &mut Sequence, expected: &'static [u8]) {
    platform
        .expect_chip_select()
        .with(eq(true))
        .times(1)
        .in_sequence(seq)
        .return_const(());
    platform
        .expect_write()
        .withf(move |tx| tx == expected)
        .times(1)
        .in_sequence(seq)
        .return_const(Ok(()));
    platform
        .expect_chip_select()
        .with(eq(false))
        .times(1)
        .in_sequence(seq)
        .return_const(());
}

pub fn expect_command_read(
    platform: &mut MockPlatform,
    seq: &mut Sequence,
    expected: &'static [u8],
    response: &'static [u8],
) {
    platform
        .expect_chip_select()
        .with(eq(true))
        .times(1)
        .in_sequence(seq)
        .return_const(());
    platform
        .expect_write_then_read()
        .withf(move |tx, _| tx == expected)
        .times(1)
        .in_sequence(seq)
        .returning(move |_tx, rx| {
            rx.copy_from_slice(response);
            Ok(())
        });
    platform
        .expect_chip_select()
        .with(eq(false))
        .times(1)
        .in_sequence(seq)
        .return_const(());
}

/// Expect one status register 1 poll, followed by the poll delay if `busy`.
pub fn expect_poll(platform: &mut MockPlatform, seq: &mut Sequence, busy: bool) {
    if busy {
        expect_command_read(platform, seq, &[0x05], &[0x01]);
        platform
            .expect_delay_us()
            .with(eq(500))
            .times(1)
            .in_sequence(seq)
            .return_const(());
    } else {
        expect_command_read(platform, seq, &[0x05], &[0x00]);
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Transaction {
    Write(Vec<u8>),
    Read(usize),
    WriteWrite(Vec<u8>, Vec<u8>),
    WriteRead(Vec<u8>, usize),
}

impl Transaction {
    pub fn opcode(&self) -> Option<u8> {
        match self {
            Transaction::Write(tx) | Transaction::WriteWrite(tx, _) | Transaction::WriteRead(tx, _) => {
                tx.first().copied()
            }
            Transaction::Read(_) => None,
        }
    }
}

/// A simulated W25Q chip that records every transaction it sees.
///
/// Panics if a transfer happens without chip select, or if two transfers
/// share one chip select.
pub struct FakeFlash {
    pub memory: Vec<u8>,
    pub transactions: Vec<Transaction>,
    pub delays: Vec<u32>,
    /// Status polls that report busy after each program or erase.
    pub busy_polls_per_operation: u32,
    pub stuck_busy: bool,
    /// Transfers starting with one of these opcodes fail with `-1`.
    pub failing_opcodes: Vec<u8>,
    pub wel: bool,
    /// Programs and erases issued while the write enable latch was clear.
    /// A real device ignores those, this one still carries them out.
    pub unlatched_operations: u32,
    busy_polls: u32,
    selected: bool,
    transfers_in_select: u32,
}

impl FakeFlash {
    pub const SIZE: usize = 256 * 1024;

    pub fn new() -> Self {
        Self {
            memory: vec![0xFF; Self::SIZE],
            transactions: Vec::new(),
            delays: Vec::new(),
            busy_polls_per_operation: 2,
            stuck_busy: false,
            failing_opcodes: Vec::new(),
            wel: false,
            unlatched_operations: 0,
            busy_polls: 0,
            selected: false,
            transfers_in_select: 0,
        }
    }

    pub fn opcodes(&self) -> Vec<u8> {
        self.transactions.iter().filter_map(Transaction::opcode).collect()
    }

    /// Opcodes without the status register 1 polls.
    pub fn commands(&self) -> Vec<u8> {
        self.opcodes().into_iter().filter(|&op| op != 0x05).collect()
    }

    /// `(address, payload)` of each page program.
    pub fn page_programs(&self) -> Vec<(u32, Vec<u8>)> {
        self.transactions
            .iter()
            .filter_map(|t| match t {
                Transaction::WriteWrite(tx, payload) if tx[0] == 0x02 => {
                    Some((address_of(tx), payload.clone()))
                }
                _ => None,
            })
            .collect()
    }

    /// `(opcode, address)` of each sector or block erase.
    pub fn erases(&self) -> Vec<(u8, u32)> {
        self.transactions
            .iter()
            .filter_map(|t| match t {
                Transaction::Write(tx) if matches!(tx[0], 0x20 | 0x52 | 0xD8) => {
                    Some((tx[0], address_of(tx)))
                }
                _ => None,
            })
            .collect()
    }

    fn begin_transfer(&mut self, tx: Option<&[u8]>) -> Result<(), i32> {
        assert!(self.selected, "transfer without chip select");
        self.transfers_in_select += 1;
        assert_eq!(1, self.transfers_in_select, "two transfers in one chip select");

        match tx.and_then(|tx| tx.first()) {
            Some(opcode) if self.failing_opcodes.contains(opcode) => Err(-1),
            _ => Ok(()),
        }
    }

    /// The device clears the write enable latch once a program or erase starts.
    fn start_operation(&mut self) {
        if !self.wel {
            self.unlatched_operations += 1;
        }
        self.wel = false;
        self.busy_polls = self.busy_polls_per_operation;
    }

    fn erase(&mut self, address: u32, size: usize) {
        let start = address as usize & !(size - 1);
        let end = usize::min(start + size, self.memory.len());
        if start < end {
            self.memory[start..end].fill(0xFF);
        }
        self.start_operation();
    }
}

fn address_of(tx: &[u8]) -> u32 {
    (tx[1] as u32) << 16 | (tx[2] as u32) << 8 | tx[3] as u32
}

impl Platform for FakeFlash {
    type Error = i32;

    fn write(&mut self, data: &[u8]) -> Result<(), i32> {
        self.transactions.push(Transaction::Write(data.to_vec()));
        self.begin_transfer(Some(data))?;

        match data[0] {
            0x06 => self.wel = true,
            0x04 => self.wel = false,
            0x20 => self.erase(address_of(data), 4 * 1024),
            0x52 => self.erase(address_of(data), 32 * 1024),
            0xD8 => self.erase(address_of(data), 64 * 1024),
            0xC7 => self.erase(0, Self::SIZE),
            _ => {}
        }
        Ok(())
    }

    fn read(&mut self, buffer: &mut [u8]) -> Result<(), i32> {
        self.transactions.push(Transaction::Read(buffer.len()));
        self.begin_transfer(None)
    }

    fn write_then_write(&mut self, header: &[u8], payload: &[u8]) -> Result<(), i32> {
        self.transactions
            .push(Transaction::WriteWrite(header.to_vec(), payload.to_vec()));
        self.begin_transfer(Some(header))?;

        if header[0] == 0x02 {
            let address = address_of(header) as usize;
            let page = address & !0xFF;
            for (i, byte) in payload.iter().enumerate() {
                // Programming wraps within the page.
                let offset = page + ((address + i) & 0xFF);
                self.memory[offset] &= byte;
            }
            self.start_operation();
        }
        Ok(())
    }

    fn write_then_read(&mut self, header: &[u8], response: &mut [u8]) -> Result<(), i32> {
        self.transactions
            .push(Transaction::WriteRead(header.to_vec(), response.len()));
        self.begin_transfer(Some(header))?;

        match header[0] {
            0x05 => {
                let busy = self.stuck_busy || self.busy_polls > 0;
                self.busy_polls = self.busy_polls.saturating_sub(1);
                response[0] = (self.wel as u8) << 1 | busy as u8;
            }
            0x03 | 0x0B => {
                let address = address_of(header) as usize;
                response.copy_from_slice(&self.memory[address..address + response.len()]);
            }
            0x90 => response.copy_from_slice(&[0xEF, 0x15]),
            0x4B => response.copy_from_slice(&[0x11, 0x22, 0x33, 0x44, 0x55, 0x66, 0x77, 0x88]),
            _ => response.fill(0x00),
        }
        Ok(())
    }

    fn chip_select(&mut self, asserted: bool) {
        assert_ne!(self.selected, asserted, "chip select toggled twice");
        self.selected = asserted;
        self.transfers_in_select = 0;
    }

    fn delay_us(&mut self, us: u32) {
        assert!(!self.selected, "delay while selected");
        self.delays.push(us);
    }
}
