/// Status codes as read from the (masked) TWI status register.

/// Status seen by the initiator after each phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MasterStatus {
    Start,
    AddressWriteAck,
    AddressWriteNack,
    DataAck,
    DataNack,
    AddressReadAck,
    AddressReadNack,
    Other(u8),
}

impl MasterStatus {
    pub fn from_code(code: u8) -> Self {
        match code {
            0x08 => MasterStatus::Start,
            0x18 => MasterStatus::AddressWriteAck,
            0x20 => MasterStatus::AddressWriteNack,
            0x28 => MasterStatus::DataAck,
            0x30 => MasterStatus::DataNack,
            0x40 => MasterStatus::AddressReadAck,
            0x48 => MasterStatus::AddressReadNack,
            other => MasterStatus::Other(other),
        }
    }

    pub fn code(self) -> u8 {
        match self {
            MasterStatus::Start => 0x08,
            MasterStatus::AddressWriteAck => 0x18,
            MasterStatus::AddressWriteNack => 0x20,
            MasterStatus::DataAck => 0x28,
            MasterStatus::DataNack => 0x30,
            MasterStatus::AddressReadAck => 0x40,
            MasterStatus::AddressReadNack => 0x48,
            MasterStatus::Other(code) => code,
        }
    }

    pub fn is_nack(self) -> bool {
        matches!(
            self,
            MasterStatus::AddressWriteNack | MasterStatus::DataNack | MasterStatus::AddressReadNack
        )
    }
}

/// Status seen by the responder application when the bus needs service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlaveStatus {
    OwnAddressWrite,
    GeneralCall,
    DataReceived,
    GeneralCallData,
    DataNack,
    GeneralCallDataNack,
    OwnAddressRead,
    Stop,
    Other(u8),
}

impl SlaveStatus {
    pub fn from_code(code: u8) -> Self {
        match code & 0xF8 {
            0x60 => SlaveStatus::OwnAddressWrite,
            0x70 => SlaveStatus::GeneralCall,
            0x80 => SlaveStatus::DataReceived,
            0x88 => SlaveStatus::DataNack,
            0x90 => SlaveStatus::GeneralCallData,
            0x98 => SlaveStatus::GeneralCallDataNack,
            0xA0 => SlaveStatus::Stop,
            0xA8 => SlaveStatus::OwnAddressRead,
            other => SlaveStatus::Other(other),
        }
    }

    pub fn code(self) -> u8 {
        match self {
            SlaveStatus::OwnAddressWrite => 0x60,
            SlaveStatus::GeneralCall => 0x70,
            SlaveStatus::DataReceived => 0x80,
            SlaveStatus::DataNack => 0x88,
            SlaveStatus::GeneralCallData => 0x90,
            SlaveStatus::GeneralCallDataNack => 0x98,
            SlaveStatus::Stop => 0xA0,
            SlaveStatus::OwnAddressRead => 0xA8,
            SlaveStatus::Other(code) => code,
        }
    }

    /// Data byte addressed to us that carries a command.
    pub fn is_addressed_write(self) -> bool {
        matches!(self, SlaveStatus::DataReceived | SlaveStatus::GeneralCallData)
    }

    pub fn is_nacked_data(self) -> bool {
        matches!(self, SlaveStatus::DataNack | SlaveStatus::GeneralCallDataNack)
    }
}
