//! Interface capability bitmask
//!
//! The ZTEX descriptor carries a 6-byte capability field. Bit `n` of the mask
//! is bit `n % 8` of byte `n / 8`. Only the low 13 bits are defined; the rest
//! are reserved and kept in the raw value without being surfaced as flags.

use bitflags::bitflags;

use crate::protocol::CAPABILITIES_LEN;

bitflags! {
    /// Capabilities advertised by the ZTEX firmware
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Capabilities: u64 {
        /// EEPROM support
        const EEPROM                   = 1 << 0;
        /// FPGA configuration support
        const FPGA_CONFIGURATION       = 1 << 1;
        /// Flash memory support
        const FLASH_MEMORY             = 1 << 2;
        /// Debug helper
        const DEBUG_HELPER             = 1 << 3;
        /// AVR XMEGA support
        const XMEGA                    = 1 << 4;
        /// High speed FPGA configuration
        const HS_FPGA_CONFIGURATION    = 1 << 5;
        /// MAC EEPROM support
        const MAC_EEPROM               = 1 << 6;
        /// Multi-FPGA support
        const MULTI_FPGA               = 1 << 7;
        /// Temperature sensor
        const TEMPERATURE_SENSOR       = 1 << 8;
        /// Second flash memory
        const FLASH_MEMORY_2           = 1 << 9;
        /// FX3 firmware
        const FX3_FIRMWARE             = 1 << 10;
        /// Second debug helper
        const DEBUG_HELPER_2           = 1 << 11;
        /// Default firmware
        const DEFAULT_FIRMWARE         = 1 << 12;
    }
}

impl Default for Capabilities {
    fn default() -> Self {
        Capabilities::empty()
    }
}

/// Report labels, in bit order
pub const CAPABILITY_LABELS: [(Capabilities, &str); 13] = [
    (Capabilities::EEPROM, "EEPROM"),
    (Capabilities::FPGA_CONFIGURATION, "FPGA Configuration"),
    (Capabilities::FLASH_MEMORY, "Flash Memory"),
    (Capabilities::DEBUG_HELPER, "Debug Helper"),
    (Capabilities::XMEGA, "XMEGA"),
    (
        Capabilities::HS_FPGA_CONFIGURATION,
        "High Speed FPGA Configuration",
    ),
    (Capabilities::MAC_EEPROM, "MAC EEPROM"),
    (Capabilities::MULTI_FPGA, "MultiFPGA"),
    (Capabilities::TEMPERATURE_SENSOR, "Temperature Sensor"),
    (Capabilities::FLASH_MEMORY_2, "Flash Memory 2"),
    (Capabilities::FX3_FIRMWARE, "FX3 Firmware"),
    (Capabilities::DEBUG_HELPER_2, "Debug Helper 2"),
    (Capabilities::DEFAULT_FIRMWARE, "Default Firmware"),
];

impl Capabilities {
    /// Build the mask from the raw descriptor field, keeping reserved bits
    pub fn from_bytes(bytes: &[u8; CAPABILITIES_LEN]) -> Self {
        let mut raw = [0u8; 8];
        raw[..CAPABILITIES_LEN].copy_from_slice(bytes);
        Capabilities::from_bits_retain(u64::from_le_bytes(raw))
    }

    /// Encode back into the 6-byte descriptor field
    pub fn to_bytes(self) -> [u8; CAPABILITIES_LEN] {
        let mut out = [0u8; CAPABILITIES_LEN];
        out.copy_from_slice(&self.bits().to_le_bytes()[..CAPABILITIES_LEN]);
        out
    }

    /// Raw mask including reserved bits
    pub fn raw(self) -> u64 {
        self.bits()
    }

    /// Bits set that no named flag describes
    pub fn reserved(self) -> u64 {
        self.bits() & !Capabilities::all().bits()
    }

    /// EEPROM present
    pub fn eeprom(self) -> bool {
        self.contains(Capabilities::EEPROM)
    }

    /// FPGA can be configured by the firmware
    pub fn fpga_configuration(self) -> bool {
        self.contains(Capabilities::FPGA_CONFIGURATION)
    }

    /// Flash memory present
    pub fn flash_memory(self) -> bool {
        self.contains(Capabilities::FLASH_MEMORY)
    }

    /// Debug helper present
    pub fn debug_helper(self) -> bool {
        self.contains(Capabilities::DEBUG_HELPER)
    }

    /// XMEGA microcontroller present
    pub fn xmega(self) -> bool {
        self.contains(Capabilities::XMEGA)
    }

    /// High speed FPGA configuration supported
    pub fn high_speed_fpga_configuration(self) -> bool {
        self.contains(Capabilities::HS_FPGA_CONFIGURATION)
    }

    /// MAC EEPROM present
    pub fn mac_eeprom(self) -> bool {
        self.contains(Capabilities::MAC_EEPROM)
    }

    /// Multiple FPGAs supported
    pub fn multi_fpga(self) -> bool {
        self.contains(Capabilities::MULTI_FPGA)
    }

    /// Temperature sensor present
    pub fn temperature_sensor(self) -> bool {
        self.contains(Capabilities::TEMPERATURE_SENSOR)
    }

    /// Second flash memory present
    pub fn flash_memory_2(self) -> bool {
        self.contains(Capabilities::FLASH_MEMORY_2)
    }

    /// Firmware runs on an FX3
    pub fn fx3_firmware(self) -> bool {
        self.contains(Capabilities::FX3_FIRMWARE)
    }

    /// Second debug helper present
    pub fn debug_helper_2(self) -> bool {
        self.contains(Capabilities::DEBUG_HELPER_2)
    }

    /// Device runs the default firmware
    pub fn default_firmware(self) -> bool {
        self.contains(Capabilities::DEFAULT_FIRMWARE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn accessors(caps: Capabilities) -> [bool; 13] {
        [
            caps.eeprom(),
            caps.fpga_configuration(),
            caps.flash_memory(),
            caps.debug_helper(),
            caps.xmega(),
            caps.high_speed_fpga_configuration(),
            caps.mac_eeprom(),
            caps.multi_fpga(),
            caps.temperature_sensor(),
            caps.flash_memory_2(),
            caps.fx3_firmware(),
            caps.debug_helper_2(),
            caps.default_firmware(),
        ]
    }

    #[test]
    fn test_eeprom_and_flash_mask() {
        let caps = Capabilities::from_bits_retain(0x0005);
        assert!(caps.eeprom());
        assert!(!caps.fpga_configuration());
        assert!(caps.flash_memory());
        let set: Vec<bool> = accessors(caps).to_vec();
        assert_eq!(set.iter().filter(|&&b| b).count(), 2);
    }

    #[test]
    fn test_every_defined_combination() {
        for mask in 0u64..(1 << 13) {
            let caps = Capabilities::from_bits_retain(mask);
            for (bit, value) in accessors(caps).iter().enumerate() {
                assert_eq!(*value, mask & (1 << bit) != 0, "mask {mask:#x} bit {bit}");
            }
            assert_eq!(caps.reserved(), 0);
        }
    }

    #[test]
    fn test_reserved_bits_do_not_affect_flags() {
        let reserved = 0x0000_FFFF_FFFF_E000u64;
        for mask in [0u64, 0x0005, 0x1FFF, 0x0842] {
            let plain = Capabilities::from_bits_retain(mask);
            let noisy = Capabilities::from_bits_retain(mask | reserved);
            assert_eq!(accessors(plain), accessors(noisy));
            assert_eq!(noisy.reserved(), reserved);
            assert_eq!(noisy.raw(), mask | reserved);
        }
    }

    #[test]
    fn test_byte_layout() {
        // byte 0 bit 6 = MAC EEPROM, byte 1 bit 4 = default firmware, byte 5 reserved
        let caps = Capabilities::from_bytes(&[0x40, 0x10, 0x00, 0x00, 0x00, 0x80]);
        assert!(caps.mac_eeprom());
        assert!(caps.default_firmware());
        assert!(!caps.eeprom());
        assert_eq!(caps.reserved(), 1 << 47);
        assert_eq!(caps.to_bytes(), [0x40, 0x10, 0x00, 0x00, 0x00, 0x80]);
    }

    #[test]
    fn test_labels_follow_bit_order() {
        for (bit, (flag, _)) in CAPABILITY_LABELS.iter().enumerate() {
            assert_eq!(flag.bits(), 1 << bit);
        }
    }
}
