pub mod fax_dto;

pub use fax_dto::{
    FaxListView, HomeQueryDto, HomeView, ListFaxesQueryDto, SendFaxDto, ShowFaxQueryDto,
};
