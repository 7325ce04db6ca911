#![forbid(unsafe_code)]

//! Standard terminfo capability names in compiled-image order.
//!
//! A compiled terminfo image stores booleans, numbers, and string offsets as
//! positional arrays. Index `i` of each array belongs to entry `i` of the
//! matching table below, which follows the ncurses `Caps` ordering used by
//! `tic`. Each entry also carries the short capname (`cup`) and the two-letter
//! termcap code (`cm`) so lookups and termcap normalization share one source.

/// One standard capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapName {
    /// terminfo variable name, e.g. `cursor_address`.
    pub name: &'static str,
    /// terminfo capname, e.g. `cup`.
    pub capname: &'static str,
    /// termcap code, e.g. `cm`.
    pub termcap: &'static str,
}

/// Which positional array a capability lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CapKind {
    /// Boolean flag.
    Boolean,
    /// Numeric value.
    Number,
    /// String (escape sequence template).
    String,
}

impl CapKind {
    /// The ordered table for this kind.
    #[must_use]
    pub const fn table(self) -> &'static [CapName] {
        match self {
            Self::Boolean => &BOOLEAN_NAMES,
            Self::Number => &NUMBER_NAMES,
            Self::String => &STRING_NAMES,
        }
    }

    /// Prefix used for synthetic extended-capability keys.
    #[must_use]
    pub const fn ext_prefix(self) -> &'static str {
        match self {
            Self::Boolean => "ext_bool_",
            Self::Number => "ext_num_",
            Self::String => "ext_str_",
        }
    }
}

/// Long name at position `index`, if the index is inside the standard table.
#[must_use]
pub fn name_at(kind: CapKind, index: usize) -> Option<&'static str> {
    kind.table().get(index).map(|cap| cap.name)
}

/// Canonical long name for either a long name or a capname.
///
/// ```
/// use weft_core::capability_names::{canonical_name, CapKind};
///
/// assert_eq!(canonical_name(CapKind::String, "cup"), Some("cursor_address"));
/// assert_eq!(canonical_name(CapKind::String, "cursor_address"), Some("cursor_address"));
/// assert_eq!(canonical_name(CapKind::String, "nonsense"), None);
/// ```
#[must_use]
pub fn canonical_name(kind: CapKind, name: &str) -> Option<&'static str> {
    kind.table()
        .iter()
        .find(|cap| cap.name == name || cap.capname == name)
        .map(|cap| cap.name)
}

/// Long name for a termcap code of the given kind.
#[must_use]
pub fn from_termcap(kind: CapKind, code: &str) -> Option<&'static str> {
    kind.table()
        .iter()
        .find(|cap| cap.termcap == code)
        .map(|cap| cap.name)
}

macro_rules! cap {
    ($name:literal, $capname:literal, $termcap:literal) => {
        CapName {
            name: $name,
            capname: $capname,
            termcap: $termcap,
        }
    };
}

pub(crate) const BOOLEAN_NAMES: [CapName; 44] = [
    cap!("auto_left_margin", "bw", "bw"),
    cap!("auto_right_margin", "am", "am"),
    cap!("no_esc_ctlc", "xsb", "xb"),
    cap!("ceol_standout_glitch", "xhp", "xs"),
    cap!("eat_newline_glitch", "xenl", "xn"),
    cap!("erase_overstrike", "eo", "eo"),
    cap!("generic_type", "gn", "gn"),
    cap!("hard_copy", "hc", "hc"),
    cap!("has_meta_key", "km", "km"),
    cap!("has_status_line", "hs", "hs"),
    cap!("insert_null_glitch", "in", "in"),
    cap!("memory_above", "da", "da"),
    cap!("memory_below", "db", "db"),
    cap!("move_insert_mode", "mir", "mi"),
    cap!("move_standout_mode", "msgr", "ms"),
    cap!("over_strike", "os", "os"),
    cap!("status_line_esc_ok", "eslok", "es"),
    cap!("dest_tabs_magic_smso", "xt", "xt"),
    cap!("tilde_glitch", "hz", "hz"),
    cap!("transparent_underline", "ul", "ul"),
    cap!("xon_xoff", "xon", "xo"),
    cap!("needs_xon_xoff", "nxon", "nx"),
    cap!("prtr_silent", "mc5i", "5i"),
    cap!("hard_cursor", "chts", "HC"),
    cap!("non_rev_rmcup", "nrrmc", "NR"),
    cap!("no_pad_char", "npc", "NP"),
    cap!("non_dest_scroll_region", "ndscr", "ND"),
    cap!("can_change", "ccc", "cc"),
    cap!("back_color_erase", "bce", "ut"),
    cap!("hue_lightness_saturation", "hls", "hl"),
    cap!("col_addr_glitch", "xhpa", "YA"),
    cap!("cr_cancels_micro_mode", "crxm", "YB"),
    cap!("has_print_wheel", "daisy", "YC"),
    cap!("row_addr_glitch", "xvpa", "YD"),
    cap!("semi_auto_right_margin", "sam", "YE"),
    cap!("cpi_changes_res", "cpix", "YF"),
    cap!("lpi_changes_res", "lpix", "YG"),
    cap!("backspaces_with_bs", "OTbs", "bs"),
    cap!("crt_no_scrolling", "OTns", "ns"),
    cap!("no_correctly_working_cr", "OTnc", "nc"),
    cap!("gnu_has_meta_key", "OTMT", "MT"),
    cap!("linefeed_is_newline", "OTNL", "NL"),
    cap!("has_hardware_tabs", "OTpt", "pt"),
    cap!("return_does_clr_eol", "OTxr", "xr"),
];

pub(crate) const NUMBER_NAMES: [CapName; 39] = [
    cap!("columns", "cols", "co"),
    cap!("init_tabs", "it", "it"),
    cap!("lines", "lines", "li"),
    cap!("lines_of_memory", "lm", "lm"),
    cap!("magic_cookie_glitch", "xmc", "sg"),
    cap!("padding_baud_rate", "pb", "pb"),
    cap!("virtual_terminal", "vt", "vt"),
    cap!("width_status_line", "wsl", "ws"),
    cap!("num_labels", "nlab", "Nl"),
    cap!("label_height", "lh", "lh"),
    cap!("label_width", "lw", "lw"),
    cap!("max_attributes", "ma", "ma"),
    cap!("maximum_windows", "wnum", "MW"),
    cap!("max_colors", "colors", "Co"),
    cap!("max_pairs", "pairs", "pa"),
    cap!("no_color_video", "ncv", "NC"),
    cap!("buffer_capacity", "bufsz", "Ya"),
    cap!("dot_vert_spacing", "spinv", "Yb"),
    cap!("dot_horz_spacing", "spinh", "Yc"),
    cap!("max_micro_address", "maddr", "Yd"),
    cap!("max_micro_jump", "mjump", "Ye"),
    cap!("micro_col_size", "mcs", "Yf"),
    cap!("micro_line_size", "mls", "Yg"),
    cap!("number_of_pins", "npins", "Yh"),
    cap!("output_res_char", "orc", "Yi"),
    cap!("output_res_line", "orl", "Yj"),
    cap!("output_res_horz_inch", "orhi", "Yk"),
    cap!("output_res_vert_inch", "orvi", "Yl"),
    cap!("print_rate", "cps", "Ym"),
    cap!("wide_char_size", "widcs", "Yn"),
    cap!("buttons", "btns", "BT"),
    cap!("bit_image_entwining", "bitwin", "Yo"),
    cap!("bit_image_type", "bitype", "Yp"),
    cap!("magic_cookie_glitch_ul", "OTug", "ug"),
    cap!("carriage_return_delay", "OTdC", "dC"),
    cap!("new_line_delay", "OTdN", "dN"),
    cap!("backspace_delay", "OTdB", "dB"),
    cap!("horizontal_tab_delay", "OTdT", "dT"),
    cap!("number_of_function_keys", "OTkn", "kn"),
];

pub(crate) const STRING_NAMES: [CapName; 414] = [
    cap!("back_tab", "cbt", "bt"),
    cap!("bell", "bel", "bl"),
    cap!("carriage_return", "cr", "cr"),
    cap!("change_scroll_region", "csr", "cs"),
    cap!("clear_all_tabs", "tbc", "ct"),
    cap!("clear_screen", "clear", "cl"),
    cap!("clr_eol", "el", "ce"),
    cap!("clr_eos", "ed", "cd"),
    cap!("column_address", "hpa", "ch"),
    cap!("command_character", "cmdch", "CC"),
    cap!("cursor_address", "cup", "cm"),
    cap!("cursor_down", "cud1", "do"),
    cap!("cursor_home", "home", "ho"),
    cap!("cursor_invisible", "civis", "vi"),
    cap!("cursor_left", "cub1", "le"),
    cap!("cursor_mem_address", "mrcup", "CM"),
    cap!("cursor_normal", "cnorm", "ve"),
    cap!("cursor_right", "cuf1", "nd"),
    cap!("cursor_to_ll", "ll", "ll"),
    cap!("cursor_up", "cuu1", "up"),
    cap!("cursor_visible", "cvvis", "vs"),
    cap!("delete_character", "dch1", "dc"),
    cap!("delete_line", "dl1", "dl"),
    cap!("dis_status_line", "dsl", "ds"),
    cap!("down_half_line", "hd", "hd"),
    cap!("enter_alt_charset_mode", "smacs", "as"),
    cap!("enter_blink_mode", "blink", "mb"),
    cap!("enter_bold_mode", "bold", "md"),
    cap!("enter_ca_mode", "smcup", "ti"),
    cap!("enter_delete_mode", "smdc", "dm"),
    cap!("enter_dim_mode", "dim", "mh"),
    cap!("enter_insert_mode", "smir", "im"),
    cap!("enter_secure_mode", "invis", "mk"),
    cap!("enter_protected_mode", "prot", "mp"),
    cap!("enter_reverse_mode", "rev", "mr"),
    cap!("enter_standout_mode", "smso", "so"),
    cap!("enter_underline_mode", "smul", "us"),
    cap!("erase_chars", "ech", "ec"),
    cap!("exit_alt_charset_mode", "rmacs", "ae"),
    cap!("exit_attribute_mode", "sgr0", "me"),
    cap!("exit_ca_mode", "rmcup", "te"),
    cap!("exit_delete_mode", "rmdc", "ed"),
    cap!("exit_insert_mode", "rmir", "ei"),
    cap!("exit_standout_mode", "rmso", "se"),
    cap!("exit_underline_mode", "rmul", "ue"),
    cap!("flash_screen", "flash", "vb"),
    cap!("form_feed", "ff", "ff"),
    cap!("from_status_line", "fsl", "fs"),
    cap!("init_1string", "is1", "i1"),
    cap!("init_2string", "is2", "is"),
    cap!("init_3string", "is3", "i3"),
    cap!("init_file", "if", "if"),
    cap!("insert_character", "ich1", "ic"),
    cap!("insert_line", "il1", "al"),
    cap!("insert_padding", "ip", "ip"),
    cap!("key_backspace", "kbs", "kb"),
    cap!("key_catab", "ktbc", "ka"),
    cap!("key_clear", "kclr", "kC"),
    cap!("key_ctab", "kctab", "kt"),
    cap!("key_dc", "kdch1", "kD"),
    cap!("key_dl", "kdl1", "kL"),
    cap!("key_down", "kcud1", "kd"),
    cap!("key_eic", "krmir", "kM"),
    cap!("key_eol", "kel", "kE"),
    cap!("key_eos", "ked", "kS"),
    cap!("key_f0", "kf0", "k0"),
    cap!("key_f1", "kf1", "k1"),
    cap!("key_f10", "kf10", "k;"),
    cap!("key_f2", "kf2", "k2"),
    cap!("key_f3", "kf3", "k3"),
    cap!("key_f4", "kf4", "k4"),
    cap!("key_f5", "kf5", "k5"),
    cap!("key_f6", "kf6", "k6"),
    cap!("key_f7", "kf7", "k7"),
    cap!("key_f8", "kf8", "k8"),
    cap!("key_f9", "kf9", "k9"),
    cap!("key_home", "khome", "kh"),
    cap!("key_ic", "kich1", "kI"),
    cap!("key_il", "kil1", "kA"),
    cap!("key_left", "kcub1", "kl"),
    cap!("key_ll", "kll", "kH"),
    cap!("key_npage", "knp", "kN"),
    cap!("key_ppage", "kpp", "kP"),
    cap!("key_right", "kcuf1", "kr"),
    cap!("key_sf", "kind", "kF"),
    cap!("key_sr", "kri", "kR"),
    cap!("key_stab", "khts", "kT"),
    cap!("key_up", "kcuu1", "ku"),
    cap!("keypad_local", "rmkx", "ke"),
    cap!("keypad_xmit", "smkx", "ks"),
    cap!("lab_f0", "lf0", "l0"),
    cap!("lab_f1", "lf1", "l1"),
    cap!("lab_f10", "lf10", "la"),
    cap!("lab_f2", "lf2", "l2"),
    cap!("lab_f3", "lf3", "l3"),
    cap!("lab_f4", "lf4", "l4"),
    cap!("lab_f5", "lf5", "l5"),
    cap!("lab_f6", "lf6", "l6"),
    cap!("lab_f7", "lf7", "l7"),
    cap!("lab_f8", "lf8", "l8"),
    cap!("lab_f9", "lf9", "l9"),
    cap!("meta_off", "rmm", "mo"),
    cap!("meta_on", "smm", "mm"),
    cap!("newline", "nel", "nw"),
    cap!("pad_char", "pad", "pc"),
    cap!("parm_dch", "dch", "DC"),
    cap!("parm_delete_line", "dl", "DL"),
    cap!("parm_down_cursor", "cud", "DO"),
    cap!("parm_ich", "ich", "IC"),
    cap!("parm_index", "indn", "SF"),
    cap!("parm_insert_line", "il", "AL"),
    cap!("parm_left_cursor", "cub", "LE"),
    cap!("parm_right_cursor", "cuf", "RI"),
    cap!("parm_rindex", "rin", "SR"),
    cap!("parm_up_cursor", "cuu", "UP"),
    cap!("pkey_key", "pfkey", "pk"),
    cap!("pkey_local", "pfloc", "pl"),
    cap!("pkey_xmit", "pfx", "px"),
    cap!("print_screen", "mc0", "ps"),
    cap!("prtr_off", "mc4", "pf"),
    cap!("prtr_on", "mc5", "po"),
    cap!("repeat_char", "rep", "rp"),
    cap!("reset_1string", "rs1", "r1"),
    cap!("reset_2string", "rs2", "r2"),
    cap!("reset_3string", "rs3", "r3"),
    cap!("reset_file", "rf", "rf"),
    cap!("restore_cursor", "rc", "rc"),
    cap!("row_address", "vpa", "cv"),
    cap!("save_cursor", "sc", "sc"),
    cap!("scroll_forward", "ind", "sf"),
    cap!("scroll_reverse", "ri", "sr"),
    cap!("set_attributes", "sgr", "sa"),
    cap!("set_tab", "hts", "st"),
    cap!("set_window", "wind", "wi"),
    cap!("tab", "ht", "ta"),
    cap!("to_status_line", "tsl", "ts"),
    cap!("underline_char", "uc", "uc"),
    cap!("up_half_line", "hu", "hu"),
    cap!("init_prog", "iprog", "iP"),
    cap!("key_a1", "ka1", "K1"),
    cap!("key_a3", "ka3", "K3"),
    cap!("key_b2", "kb2", "K2"),
    cap!("key_c1", "kc1", "K4"),
    cap!("key_c3", "kc3", "K5"),
    cap!("prtr_non", "mc5p", "pO"),
    cap!("char_padding", "rmp", "rP"),
    cap!("acs_chars", "acsc", "ac"),
    cap!("plab_norm", "pln", "pn"),
    cap!("key_btab", "kcbt", "kB"),
    cap!("enter_xon_mode", "smxon", "SX"),
    cap!("exit_xon_mode", "rmxon", "RX"),
    cap!("enter_am_mode", "smam", "SA"),
    cap!("exit_am_mode", "rmam", "RA"),
    cap!("xon_character", "xonc", "XN"),
    cap!("xoff_character", "xoffc", "XF"),
    cap!("ena_acs", "enacs", "eA"),
    cap!("label_on", "smln", "LO"),
    cap!("label_off", "rmln", "LF"),
    cap!("key_beg", "kbeg", "@1"),
    cap!("key_cancel", "kcan", "@2"),
    cap!("key_close", "kclo", "@3"),
    cap!("key_command", "kcmd", "@4"),
    cap!("key_copy", "kcpy", "@5"),
    cap!("key_create", "kcrt", "@6"),
    cap!("key_end", "kend", "@7"),
    cap!("key_enter", "kent", "@8"),
    cap!("key_exit", "kext", "@9"),
    cap!("key_find", "kfnd", "@0"),
    cap!("key_help", "khlp", "%1"),
    cap!("key_mark", "kmrk", "%2"),
    cap!("key_message", "kmsg", "%3"),
    cap!("key_move", "kmov", "%4"),
    cap!("key_next", "knxt", "%5"),
    cap!("key_open", "kopn", "%6"),
    cap!("key_options", "kopt", "%7"),
    cap!("key_previous", "kprv", "%8"),
    cap!("key_print", "kprt", "%9"),
    cap!("key_redo", "krdo", "%0"),
    cap!("key_reference", "kref", "&1"),
    cap!("key_refresh", "krfr", "&2"),
    cap!("key_replace", "krpl", "&3"),
    cap!("key_restart", "krst", "&4"),
    cap!("key_resume", "kres", "&5"),
    cap!("key_save", "ksav", "&6"),
    cap!("key_suspend", "kspd", "&7"),
    cap!("key_undo", "kund", "&8"),
    cap!("key_sbeg", "kBEG", "&9"),
    cap!("key_scancel", "kCAN", "&0"),
    cap!("key_scommand", "kCMD", "*1"),
    cap!("key_scopy", "kCPY", "*2"),
    cap!("key_screate", "kCRT", "*3"),
    cap!("key_sdc", "kDC", "*4"),
    cap!("key_sdl", "kDL", "*5"),
    cap!("key_select", "kslt", "*6"),
    cap!("key_send", "kEND", "*7"),
    cap!("key_seol", "kEOL", "*8"),
    cap!("key_sexit", "kEXT", "*9"),
    cap!("key_sfind", "kFND", "*0"),
    cap!("key_shelp", "kHLP", "#1"),
    cap!("key_shome", "kHOM", "#2"),
    cap!("key_sic", "kIC", "#3"),
    cap!("key_sleft", "kLFT", "#4"),
    cap!("key_smessage", "kMSG", "%a"),
    cap!("key_smove", "kMOV", "%b"),
    cap!("key_snext", "kNXT", "%c"),
    cap!("key_soptions", "kOPT", "%d"),
    cap!("key_sprevious", "kPRV", "%e"),
    cap!("key_sprint", "kPRT", "%f"),
    cap!("key_sredo", "kRDO", "%g"),
    cap!("key_sreplace", "kRPL", "%h"),
    cap!("key_sright", "kRIT", "%i"),
    cap!("key_srsume", "kRES", "%j"),
    cap!("key_ssave", "kSAV", "!1"),
    cap!("key_ssuspend", "kSPD", "!2"),
    cap!("key_sundo", "kUND", "!3"),
    cap!("req_for_input", "rfi", "RF"),
    cap!("key_f11", "kf11", "F1"),
    cap!("key_f12", "kf12", "F2"),
    cap!("key_f13", "kf13", "F3"),
    cap!("key_f14", "kf14", "F4"),
    cap!("key_f15", "kf15", "F5"),
    cap!("key_f16", "kf16", "F6"),
    cap!("key_f17", "kf17", "F7"),
    cap!("key_f18", "kf18", "F8"),
    cap!("key_f19", "kf19", "F9"),
    cap!("key_f20", "kf20", "FA"),
    cap!("key_f21", "kf21", "FB"),
    cap!("key_f22", "kf22", "FC"),
    cap!("key_f23", "kf23", "FD"),
    cap!("key_f24", "kf24", "FE"),
    cap!("key_f25", "kf25", "FF"),
    cap!("key_f26", "kf26", "FG"),
    cap!("key_f27", "kf27", "FH"),
    cap!("key_f28", "kf28", "FI"),
    cap!("key_f29", "kf29", "FJ"),
    cap!("key_f30", "kf30", "FK"),
    cap!("key_f31", "kf31", "FL"),
    cap!("key_f32", "kf32", "FM"),
    cap!("key_f33", "kf33", "FN"),
    cap!("key_f34", "kf34", "FO"),
    cap!("key_f35", "kf35", "FP"),
    cap!("key_f36", "kf36", "FQ"),
    cap!("key_f37", "kf37", "FR"),
    cap!("key_f38", "kf38", "FS"),
    cap!("key_f39", "kf39", "FT"),
    cap!("key_f40", "kf40", "FU"),
    cap!("key_f41", "kf41", "FV"),
    cap!("key_f42", "kf42", "FW"),
    cap!("key_f43", "kf43", "FX"),
    cap!("key_f44", "kf44", "FY"),
    cap!("key_f45", "kf45", "FZ"),
    cap!("key_f46", "kf46", "Fa"),
    cap!("key_f47", "kf47", "Fb"),
    cap!("key_f48", "kf48", "Fc"),
    cap!("key_f49", "kf49", "Fd"),
    cap!("key_f50", "kf50", "Fe"),
    cap!("key_f51", "kf51", "Ff"),
    cap!("key_f52", "kf52", "Fg"),
    cap!("key_f53", "kf53", "Fh"),
    cap!("key_f54", "kf54", "Fi"),
    cap!("key_f55", "kf55", "Fj"),
    cap!("key_f56", "kf56", "Fk"),
    cap!("key_f57", "kf57", "Fl"),
    cap!("key_f58", "kf58", "Fm"),
    cap!("key_f59", "kf59", "Fn"),
    cap!("key_f60", "kf60", "Fo"),
    cap!("key_f61", "kf61", "Fp"),
    cap!("key_f62", "kf62", "Fq"),
    cap!("key_f63", "kf63", "Fr"),
    cap!("clr_bol", "el1", "cb"),
    cap!("clear_margins", "mgc", "MC"),
    cap!("set_left_margin", "smgl", "ML"),
    cap!("set_right_margin", "smgr", "MR"),
    cap!("label_format", "fln", "Lf"),
    cap!("set_clock", "sclk", "SC"),
    cap!("display_clock", "dclk", "DK"),
    cap!("remove_clock", "rmclk", "RC"),
    cap!("create_window", "cwin", "CW"),
    cap!("goto_window", "wingo", "WG"),
    cap!("hangup", "hup", "HU"),
    cap!("dial_phone", "dial", "DI"),
    cap!("quick_dial", "qdial", "QD"),
    cap!("tone", "tone", "TO"),
    cap!("pulse", "pulse", "PU"),
    cap!("flash_hook", "hook", "fh"),
    cap!("fixed_pause", "pause", "PA"),
    cap!("wait_tone", "wait", "WA"),
    cap!("user0", "u0", "u0"),
    cap!("user1", "u1", "u1"),
    cap!("user2", "u2", "u2"),
    cap!("user3", "u3", "u3"),
    cap!("user4", "u4", "u4"),
    cap!("user5", "u5", "u5"),
    cap!("user6", "u6", "u6"),
    cap!("user7", "u7", "u7"),
    cap!("user8", "u8", "u8"),
    cap!("user9", "u9", "u9"),
    cap!("orig_pair", "op", "op"),
    cap!("orig_colors", "oc", "oc"),
    cap!("initialize_color", "initc", "Ic"),
    cap!("initialize_pair", "initp", "Ip"),
    cap!("set_color_pair", "scp", "sp"),
    cap!("set_foreground", "setf", "Sf"),
    cap!("set_background", "setb", "Sb"),
    cap!("change_char_pitch", "cpi", "ZA"),
    cap!("change_line_pitch", "lpi", "ZB"),
    cap!("change_res_horz", "chr", "ZC"),
    cap!("change_res_vert", "cvr", "ZD"),
    cap!("define_char", "defc", "ZE"),
    cap!("enter_doublewide_mode", "swidm", "ZF"),
    cap!("enter_draft_quality", "sdrfq", "ZG"),
    cap!("enter_italics_mode", "sitm", "ZH"),
    cap!("enter_leftward_mode", "slm", "ZI"),
    cap!("enter_micro_mode", "smicm", "ZJ"),
    cap!("enter_near_letter_quality", "snlq", "ZK"),
    cap!("enter_normal_quality", "snrmq", "ZL"),
    cap!("enter_shadow_mode", "sshm", "ZM"),
    cap!("enter_subscript_mode", "ssubm", "ZN"),
    cap!("enter_superscript_mode", "ssupm", "ZO"),
    cap!("enter_upward_mode", "sum", "ZP"),
    cap!("exit_doublewide_mode", "rwidm", "ZQ"),
    cap!("exit_italics_mode", "ritm", "ZR"),
    cap!("exit_leftward_mode", "rlm", "ZS"),
    cap!("exit_micro_mode", "rmicm", "ZT"),
    cap!("exit_shadow_mode", "rshm", "ZU"),
    cap!("exit_subscript_mode", "rsubm", "ZV"),
    cap!("exit_superscript_mode", "rsupm", "ZW"),
    cap!("exit_upward_mode", "rum", "ZX"),
    cap!("micro_column_address", "mhpa", "ZY"),
    cap!("micro_down", "mcud1", "ZZ"),
    cap!("micro_left", "mcub1", "Za"),
    cap!("micro_right", "mcuf1", "Zb"),
    cap!("micro_row_address", "mvpa", "Zc"),
    cap!("micro_up", "mcuu1", "Zd"),
    cap!("order_of_pins", "porder", "Ze"),
    cap!("parm_down_micro", "mcud", "Zf"),
    cap!("parm_left_micro", "mcub", "Zg"),
    cap!("parm_right_micro", "mcuf", "Zh"),
    cap!("parm_up_micro", "mcuu", "Zi"),
    cap!("select_char_set", "scs", "Zj"),
    cap!("set_bottom_margin", "smgb", "Zk"),
    cap!("set_bottom_margin_parm", "smgbp", "Zl"),
    cap!("set_left_margin_parm", "smglp", "Zm"),
    cap!("set_right_margin_parm", "smgrp", "Zn"),
    cap!("set_top_margin", "smgt", "Zo"),
    cap!("set_top_margin_parm", "smgtp", "Zp"),
    cap!("start_bit_image", "sbim", "Zq"),
    cap!("start_char_set_def", "scsd", "Zr"),
    cap!("stop_bit_image", "rbim", "Zs"),
    cap!("stop_char_set_def", "rcsd", "Zt"),
    cap!("subscript_characters", "subcs", "Zu"),
    cap!("superscript_characters", "supcs", "Zv"),
    cap!("these_cause_cr", "docr", "Zw"),
    cap!("zero_motion", "zerom", "Zx"),
    cap!("char_set_names", "csnm", "Zy"),
    cap!("key_mouse", "kmous", "Km"),
    cap!("mouse_info", "minfo", "Mi"),
    cap!("req_mouse_pos", "reqmp", "RQ"),
    cap!("get_mouse", "getm", "Gm"),
    cap!("set_a_foreground", "setaf", "AF"),
    cap!("set_a_background", "setab", "AB"),
    cap!("pkey_plab", "pfxl", "xl"),
    cap!("device_type", "devt", "dv"),
    cap!("code_set_init", "csin", "ci"),
    cap!("set0_des_seq", "s0ds", "s0"),
    cap!("set1_des_seq", "s1ds", "s1"),
    cap!("set2_des_seq", "s2ds", "s2"),
    cap!("set3_des_seq", "s3ds", "s3"),
    cap!("set_lr_margin", "smglr", "ML"),
    cap!("set_tb_margin", "smgtb", "MT"),
    cap!("bit_image_repeat", "birep", "Xy"),
    cap!("bit_image_newline", "binel", "Zz"),
    cap!("bit_image_carriage_return", "bicr", "Yv"),
    cap!("color_names", "colornm", "Yw"),
    cap!("define_bit_image_region", "defbi", "Yx"),
    cap!("end_bit_image_region", "endbi", "Yy"),
    cap!("set_color_band", "setcolor", "Yz"),
    cap!("set_page_length", "slines", "YZ"),
    cap!("display_pc_char", "dispc", "S1"),
    cap!("enter_pc_charset_mode", "smpch", "S2"),
    cap!("exit_pc_charset_mode", "rmpch", "S3"),
    cap!("enter_scancode_mode", "smsc", "S4"),
    cap!("exit_scancode_mode", "rmsc", "S5"),
    cap!("pc_term_options", "pctrm", "S6"),
    cap!("scancode_escape", "scesc", "S7"),
    cap!("alt_scancode_esc", "scesa", "S8"),
    cap!("enter_horizontal_hl_mode", "ehhlm", "Xh"),
    cap!("enter_left_hl_mode", "elhlm", "Xl"),
    cap!("enter_low_hl_mode", "elohlm", "Xo"),
    cap!("enter_right_hl_mode", "erhlm", "Xr"),
    cap!("enter_top_hl_mode", "ethlm", "Xt"),
    cap!("enter_vertical_hl_mode", "evhlm", "Xv"),
    cap!("set_a_attributes", "sgr1", "sA"),
    cap!("set_pglen_inch", "slength", "YI"),
    cap!("termcap_init2", "OTi2", "i2"),
    cap!("termcap_reset", "OTrs", "rs"),
    cap!("linefeed_if_not_lf", "OTnl", "nl"),
    cap!("backspace_if_not_bs", "OTbc", "bc"),
    cap!("other_non_function_keys", "OTko", "ko"),
    cap!("arrow_key_map", "OTma", "ma"),
    cap!("acs_ulcorner", "OTG2", "G2"),
    cap!("acs_llcorner", "OTG3", "G3"),
    cap!("acs_urcorner", "OTG1", "G1"),
    cap!("acs_lrcorner", "OTG4", "G4"),
    cap!("acs_ltee", "OTGR", "GR"),
    cap!("acs_rtee", "OTGL", "GL"),
    cap!("acs_btee", "OTGU", "GU"),
    cap!("acs_ttee", "OTGD", "GD"),
    cap!("acs_hline", "OTGH", "GH"),
    cap!("acs_vline", "OTGV", "GV"),
    cap!("acs_plus", "OTGC", "GC"),
    cap!("memory_lock", "meml", "ml"),
    cap!("memory_unlock", "memu", "mu"),
    cap!("box_chars_1", "box1", "bx"),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_sizes_match_ncurses() {
        assert_eq!(BOOLEAN_NAMES.len(), 44);
        assert_eq!(NUMBER_NAMES.len(), 39);
        assert_eq!(STRING_NAMES.len(), 414);
    }

    #[test]
    fn positions_of_well_known_caps() {
        assert_eq!(name_at(CapKind::Boolean, 1), Some("auto_right_margin"));
        assert_eq!(name_at(CapKind::Number, 0), Some("columns"));
        assert_eq!(name_at(CapKind::Number, 13), Some("max_colors"));
        assert_eq!(name_at(CapKind::String, 10), Some("cursor_address"));
        assert_eq!(name_at(CapKind::String, 413), Some("box_chars_1"));
        assert_eq!(name_at(CapKind::String, 414), None);
    }

    #[test]
    fn termcap_codes_resolve_per_kind() {
        assert_eq!(from_termcap(CapKind::String, "cm"), Some("cursor_address"));
        assert_eq!(from_termcap(CapKind::Number, "co"), Some("columns"));
        assert_eq!(from_termcap(CapKind::Boolean, "am"), Some("auto_right_margin"));
        // `ma` is a number and, separately, an obsolete string.
        assert_eq!(from_termcap(CapKind::Number, "ma"), Some("max_attributes"));
        assert_eq!(from_termcap(CapKind::String, "ma"), Some("arrow_key_map"));
        assert_eq!(from_termcap(CapKind::String, "zz"), None);
    }

    #[test]
    fn names_are_unique_within_a_kind() {
        for kind in [CapKind::Boolean, CapKind::Number, CapKind::String] {
            let table = kind.table();
            for (i, a) in table.iter().enumerate() {
                for b in &table[i + 1..] {
                    assert_ne!(a.name, b.name, "duplicate name in {kind:?}");
                    assert_ne!(a.capname, b.capname, "duplicate capname in {kind:?}");
                }
            }
        }
    }
}
