//! Constants for hwtree
//!
//! Centralizes hwdb keys, sysfs attribute names, class codes and default
//! locations so the device model and the enumerator agree on them.

/// Default filesystem locations
pub mod paths {
    /// Root of the sysfs mount
    pub const SYSFS_ROOT: &str = "/sys";

    /// udev runtime database, one file per device
    pub const UDEV_DATA_DIR: &str = "/run/udev/data";

    /// System-wide configuration file
    pub const SYSTEM_CONFIG_FILE: &str = "/etc/hwtree/config.json";

    /// Directory name below the user's config dir
    pub const CONFIG_DIR_NAME: &str = "hwtree";

    /// Configuration file name
    pub const CONFIG_FILE_NAME: &str = "config.json";
}

/// Subsystem names reported by the kernel
pub mod subsystem {
    pub const PCI: &str = "pci";
    pub const USB: &str = "usb";
    pub const DMI: &str = "dmi";
    pub const HID: &str = "hid";
    pub const BLUETOOTH: &str = "bluetooth";
    pub const WIFI: &str = "ieee80211";

    /// Subsystems scanned when nothing else is configured
    pub const DEFAULT_SCAN: &[&str] = &[PCI, USB, HID, DMI, BLUETOOTH, WIFI];
}

/// Keys looked up in the hardware database property list
pub mod hwdb {
    pub const VENDOR_FROM_DATABASE: &str = "ID_VENDOR_FROM_DATABASE";
    pub const VENDOR: &str = "ID_VENDOR";
    pub const MODEL_FROM_DATABASE: &str = "ID_MODEL_FROM_DATABASE";
    pub const MODEL: &str = "ID_MODEL";
}

/// sysfs attribute names consumed by the variant initializers
pub mod sysattr {
    pub const MODALIAS: &str = "modalias";

    pub const PCI_VENDOR: &str = "vendor";
    pub const PCI_DEVICE: &str = "device";
    pub const PCI_SUBSYSTEM_VENDOR: &str = "subsystem_vendor";
    pub const PCI_SUBSYSTEM_DEVICE: &str = "subsystem_device";
    pub const PCI_CLASS: &str = "class";
    pub const PCI_BOOT_VGA: &str = "boot_vga";

    pub const USB_VENDOR: &str = "idVendor";
    pub const USB_PRODUCT: &str = "idProduct";
    pub const USB_BUSNUM: &str = "busnum";
    pub const USB_DEVNUM: &str = "devnum";
    pub const USB_DEVICE_CLASS: &str = "bDeviceClass";
    pub const USB_INTERFACE_CLASS: &str = "bInterfaceClass";
    pub const USB_MANUFACTURER: &str = "manufacturer";
    pub const USB_PRODUCT_NAME: &str = "product";

    pub const DMI_SYS_VENDOR: &str = "sys_vendor";
    pub const DMI_PRODUCT_NAME: &str = "product_name";
    pub const DMI_PRODUCT_VERSION: &str = "product_version";
    pub const DMI_BOARD_VENDOR: &str = "board_vendor";
    pub const DMI_BOARD_NAME: &str = "board_name";
    pub const DMI_BIOS_VENDOR: &str = "bios_vendor";
    pub const DMI_BIOS_VERSION: &str = "bios_version";

    pub const BLUETOOTH_ADDRESS: &str = "address";
    pub const WIFI_MAC_ADDRESS: &str = "macaddress";

    /// Device number, "major:minor"
    pub const DEV: &str = "dev";
}

/// PCI class codes (upper bytes of the 24-bit `class` attribute)
pub mod pci_class {
    /// Base class for mass storage controllers
    pub const MASS_STORAGE: u32 = 0x01;
    /// Base class for display controllers (VGA, XGA, 3D)
    pub const DISPLAY: u32 = 0x03;
    /// Multimedia audio controller (base + subclass)
    pub const MULTIMEDIA_AUDIO: u32 = 0x0401;
    /// HD audio device (base + subclass)
    pub const MULTIMEDIA_HDA: u32 = 0x0403;
}

/// USB class codes from bDeviceClass / bInterfaceClass
pub mod usb_class {
    pub const AUDIO: u8 = 0x01;
    pub const HID: u8 = 0x03;
    pub const IMAGE: u8 = 0x06;
    pub const PRINTER: u8 = 0x07;
    pub const MASS_STORAGE: u8 = 0x08;
    pub const VIDEO: u8 = 0x0e;
    pub const WIRELESS: u8 = 0xe0;
}

/// PCI vendor IDs of interest to GPU consumers
pub mod vendor {
    pub const INTEL: u32 = 0x8086;
    pub const NVIDIA: u32 = 0x10de;
    pub const AMD: u32 = 0x1002;
}
