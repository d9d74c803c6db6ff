//! WITS Level 0 channel codes (Record 01, time-based drilling data)

use crate::record::CanonicalRecord;

/// A drilling channel carried in every frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    BitDepth,
    HoleDepth,
    Rop,
    HookLoad,
    Wob,
    Rpm,
    Torque,
    Spp,
    PumpSpm,
    FlowIn,
    MwIn,
    MwOut,
    Ecd,
    TempIn,
    TempOut,
    Gas,
    PitVolume,
    BlockPos,
}

/// Channels in the order they appear inside a frame.
///
/// Follows the conventional Record 01 grouping, not code order.
pub const FRAME_CHANNELS: [Channel; 18] = [
    Channel::BitDepth,
    Channel::HoleDepth,
    Channel::Rop,
    Channel::HookLoad,
    Channel::Wob,
    Channel::Rpm,
    Channel::Torque,
    Channel::Spp,
    Channel::PumpSpm,
    Channel::FlowIn,
    Channel::MwIn,
    Channel::MwOut,
    Channel::Ecd,
    Channel::TempIn,
    Channel::TempOut,
    Channel::Gas,
    Channel::PitVolume,
    Channel::BlockPos,
];

impl Channel {
    /// Four-digit WITS item code.
    pub const fn code(self) -> &'static str {
        match self {
            Channel::BlockPos => "0105",
            Channel::BitDepth => "0108",
            Channel::HoleDepth => "0110",
            Channel::Rop => "0113",
            Channel::HookLoad => "0114",
            Channel::Wob => "0116",
            Channel::Rpm => "0117",
            Channel::Torque => "0118",
            Channel::Spp => "0119",
            Channel::PumpSpm => "0120",
            Channel::FlowIn => "0121",
            Channel::PitVolume => "0123",
            Channel::MwIn => "0124",
            Channel::MwOut => "0125",
            Channel::TempIn => "0126",
            Channel::TempOut => "0127",
            Channel::Gas => "0140",
            Channel::Ecd => "0150",
        }
    }

    /// Read this channel's value from a record.
    pub fn value(self, record: &CanonicalRecord) -> f64 {
        match self {
            Channel::BitDepth => record.bit_depth,
            Channel::HoleDepth => record.hole_depth,
            Channel::Rop => record.rop,
            Channel::HookLoad => record.hook_load,
            Channel::Wob => record.wob,
            Channel::Rpm => record.rpm,
            Channel::Torque => record.torque,
            Channel::Spp => record.spp,
            Channel::PumpSpm => record.pump_spm,
            Channel::FlowIn => record.flow_in,
            Channel::MwIn => record.mw_in,
            Channel::MwOut => record.mw_out,
            Channel::Ecd => record.ecd,
            Channel::TempIn => record.temp_in,
            Channel::TempOut => record.temp_out,
            Channel::Gas => record.gas,
            Channel::PitVolume => record.pit_volume,
            Channel::BlockPos => record.block_pos,
        }
    }
}
