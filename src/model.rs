//! Members of the AD56x4 family

/// Resolution of a DAC channel
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub enum Resolution {
    /// 12 bit, the lowest 4 data bits are ignored
    Bits12,
    /// 14 bit, the lowest 2 data bits are ignored
    Bits14,
    /// 16 bit
    Bits16,
}

impl Resolution {
    /// Number of significant bits
    pub fn bits(&self) -> u8 {
        match self {
            Resolution::Bits12 => 12,
            Resolution::Bits14 => 14,
            Resolution::Bits16 => 16,
        }
    }

    /// Largest right aligned code
    pub fn max_code(&self) -> u16 {
        u16::MAX >> (16 - self.bits())
    }

    /// Turn a right aligned code into the left aligned 16 bit data word.
    ///
    /// Returns `None` if `code` exceeds [`Self::max_code`].
    /// ```
    /// # use ad56x4::Resolution;
    /// assert_eq!(Resolution::Bits12.left_align(0xabc), Some(0xabc0));
    /// assert_eq!(Resolution::Bits12.left_align(0x1000), None);
    /// ```
    pub fn left_align(&self, code: u16) -> Option<u16> {
        if code > self.max_code() {
            return None;
        }
        Some(code << (16 - self.bits()))
    }
}

/// Chip variants
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub enum Model {
    /// 12 bit, external reference
    Ad5624,
    /// 16 bit, external reference
    Ad5664,
    /// 12 bit, internal reference
    Ad5624R,
    /// 14 bit, internal reference
    Ad5644R,
    /// 16 bit, internal reference
    Ad5664R,
}

impl Model {
    /// Channel resolution of the part
    pub fn resolution(&self) -> Resolution {
        match self {
            Model::Ad5624 | Model::Ad5624R => Resolution::Bits12,
            Model::Ad5644R => Resolution::Bits14,
            Model::Ad5664 | Model::Ad5664R => Resolution::Bits16,
        }
    }

    /// Whether [`crate::Ad56x4::use_internal_reference`] has an effect
    pub fn has_internal_reference(&self) -> bool {
        matches!(self, Model::Ad5624R | Model::Ad5644R | Model::Ad5664R)
    }
}
